//! Scarcity rules for one selection round: tier-group caps and tag
//! coverage guarantees. Both are mutated as picks are drawn and discarded
//! with the round.

use crate::catalog::{CandidateId, Catalog, Tag, Tier};
use crate::config::SelectionConfig;
use crate::selection::pool::WeightedPool;
use crate::selection::types::Rgb;

/// A named set of tiers sharing one remaining-picks cap. Membership is an
/// explicit list so groups can be inspected and extended by hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct TierGroupCap {
    pub label: String,
    pub tiers: Vec<Tier>,
    pub remaining: u32,
}

impl TierGroupCap {
    pub fn new(label: impl Into<String>, tiers: Vec<Tier>, remaining: u32) -> Self {
        Self {
            label: label.into(),
            tiers,
            remaining,
        }
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.tiers.contains(&tier)
    }
}

/// A round-scoped promise that `remaining` picks will carry one of these
/// tags. Stops restricting once satisfied or unsatisfiable.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGuarantee {
    pub label: String,
    pub tags: Vec<Tag>,
    pub color: Rgb,
    pub remaining: u32,
}

impl TagGuarantee {
    pub fn new(label: impl Into<String>, tags: Vec<Tag>, color: Rgb, remaining: u32) -> Self {
        Self {
            label: label.into(),
            tags,
            color,
            remaining,
        }
    }

    fn intersects(&self, tags: &[Tag]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// The scarcity rules active for one round, in declaration order. Guarantee
/// order is the documented tie-break for color attribution.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pub tier_caps: Vec<TierGroupCap>,
    pub guarantees: Vec<TagGuarantee>,
}

impl ConstraintSet {
    pub fn from_config(cfg: &SelectionConfig) -> Self {
        let mut tier_caps = Vec::new();
        for tier in Tier::ALL {
            match cfg.tier_caps.get(&tier) {
                Some(&cap) if cap > 0 => {
                    tier_caps.push(TierGroupCap::new(format!("{tier:?}"), vec![tier], cap));
                }
                _ => {}
            }
        }
        if cfg.void_cap > 0 {
            tier_caps.push(TierGroupCap::new(
                "Void",
                vec![Tier::VoidTier1, Tier::VoidTier2, Tier::VoidTier3],
                cfg.void_cap,
            ));
        }

        let mut guarantees = Vec::new();
        if cfg.guarantee_categories {
            guarantees.push(TagGuarantee::new(
                "Damage",
                vec![Tag::Damage],
                Rgb::GUARANTEE_DAMAGE,
                1,
            ));
            guarantees.push(TagGuarantee::new(
                "Utility",
                vec![Tag::Utility],
                Rgb::GUARANTEE_UTILITY,
                1,
            ));
            guarantees.push(TagGuarantee::new(
                "Healing",
                vec![Tag::Healing],
                Rgb::GUARANTEE_HEALING,
                1,
            ));
        }

        Self {
            tier_caps,
            guarantees,
        }
    }

    /// Tags still under an active guarantee, in guarantee order.
    pub fn active_guarantee_tags(&self) -> Vec<Tag> {
        let mut tags = Vec::new();
        for g in self.guarantees.iter().filter(|g| g.remaining > 0) {
            for &t in &g.tags {
                if !tags.contains(&t) {
                    tags.push(t);
                }
            }
        }
        tags
    }

    /// Credit the first active guarantee intersecting `tags` and return its
    /// color. Satisfied guarantees never match again, so remaining counts
    /// stay non-negative.
    pub fn consume_guarantee(&mut self, tags: &[Tag]) -> Option<Rgb> {
        for g in self.guarantees.iter_mut() {
            if g.remaining > 0 && g.intersects(tags) {
                g.remaining -= 1;
                return Some(g.color);
            }
        }
        None
    }

    /// Force any guarantee that no remaining pool entry can satisfy to
    /// remaining 0 so it stops restricting draws.
    pub fn expire_unsatisfiable(&mut self, pool: &WeightedPool<CandidateId>, catalog: &impl Catalog) {
        for g in self.guarantees.iter_mut() {
            if g.remaining == 0 {
                continue;
            }
            let satisfiable = pool.values().any(|id| match catalog.entry(id) {
                Some(entry) => g.intersects(&entry.tags),
                None => false,
            });
            if !satisfiable {
                g.remaining = 0;
            }
        }
    }

    /// Decrement every cap containing `tier`; a cap hitting 0 purges all
    /// remaining pool entries of its group.
    pub fn apply_tier_caps(
        &mut self,
        tier: Tier,
        pool: &mut WeightedPool<CandidateId>,
        catalog: &impl Catalog,
    ) {
        for cap in self.tier_caps.iter_mut() {
            if !cap.contains(tier) || cap.remaining == 0 {
                continue;
            }
            cap.remaining -= 1;
            if cap.remaining == 0 {
                pool.remove_all(|&id| match catalog.entry(id) {
                    Some(entry) => cap.tiers.contains(&entry.tier),
                    None => false,
                });
            }
        }
    }
}
