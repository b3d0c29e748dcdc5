//! Per-round pool construction: tier-weight derivation plus catalog
//! filtering. Pools are a function of current progression state, so they
//! are rebuilt from scratch for every round and never reused.

use std::collections::{HashMap, HashSet};

use crate::catalog::{CandidateId, CandidateKind, Catalog, Tier};
use crate::config::SelectionConfig;
use crate::selection::pool::WeightedPool;

/// Derive the per-tier weight table for a round.
///
/// Forced intervals first: the largest configured interval `n` with
/// `spent % n == n - 1` pins its tier set to weight 1 and everything else
/// to 0. Otherwise the baseline table applies. Void tiers then inherit
/// `base * void_weight_mult` from their base tier either way.
pub fn derive_tier_weights(cfg: &SelectionConfig, spent_upgrades: u32) -> HashMap<Tier, f64> {
    let forced = forced_tiers(cfg, spent_upgrades);

    let mut weights = HashMap::new();
    for (&tier, &base) in &cfg.tier_weights {
        let weight = if forced.is_empty() {
            base
        } else if forced.contains(&tier) {
            1.0
        } else {
            0.0
        };
        weights.insert(tier, weight);
    }

    for tier in Tier::ALL {
        if tier.is_void() {
            continue;
        }
        if let Some(void_tier) = tier.void_equivalent() {
            let base = weights.get(&tier).copied().unwrap_or(0.0);
            weights.insert(void_tier, base * cfg.void_weight_mult);
        }
    }

    weights
}

/// Tiers forced by the coarsest matching upgrade interval, if any.
fn forced_tiers(cfg: &SelectionConfig, spent_upgrades: u32) -> Vec<Tier> {
    let mut intervals: Vec<u32> = cfg
        .tier_upgrade_intervals
        .values()
        .copied()
        .filter(|&n| n > 0)
        .collect();
    intervals.sort_unstable_by(|a, b| b.cmp(a));
    intervals.dedup();

    for n in intervals {
        if spent_upgrades % n == n - 1 {
            let mut tiers: Vec<Tier> = cfg
                .tier_upgrade_intervals
                .iter()
                .filter(|(_, &interval)| interval == n)
                .map(|(&tier, _)| tier)
                .collect();
            tiers.sort_unstable_by_key(|t| Tier::ALL.iter().position(|x| x == t));
            return tiers;
        }
    }
    Vec::new()
}

/// Build the item pool for one round: every available, visible,
/// non-world-unique, non-banished item whose tier weight is strictly
/// positive, in catalog order.
pub fn build_item_pool(
    catalog: &impl Catalog,
    weights: &HashMap<Tier, f64>,
    banished: &HashSet<CandidateId>,
) -> WeightedPool<CandidateId> {
    let mut pool = WeightedPool::new();
    for entry in catalog.entries() {
        if entry.kind != CandidateKind::Item {
            continue;
        }
        let weight = match weights.get(&entry.tier) {
            Some(&w) if w > 0.0 => w,
            _ => continue,
        };
        if !entry.available || entry.hidden || entry.world_unique {
            continue;
        }
        if banished.contains(&entry.id) {
            continue;
        }
        pool.add_choice(entry.id, weight);
    }
    pool
}

/// Build the equipment pool: flat base chance, halved for lunar gear, with
/// the currently equipped id and banished ids excluded.
pub fn build_gear_pool(
    catalog: &impl Catalog,
    cfg: &SelectionConfig,
    banished: &HashSet<CandidateId>,
    equipped: Option<CandidateId>,
) -> WeightedPool<CandidateId> {
    let mut pool = WeightedPool::new();
    for entry in catalog.entries() {
        if entry.kind != CandidateKind::Equipment {
            continue;
        }
        if !entry.available || entry.hidden || entry.world_unique {
            continue;
        }
        if banished.contains(&entry.id) || equipped == Some(entry.id) {
            continue;
        }
        let weight = if entry.tier == Tier::Lunar {
            cfg.base_lunar_equip_chance
        } else {
            cfg.base_equip_chance
        };
        pool.add_choice(entry.id, weight);
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, RewardCatalog, Tag};

    fn cfg() -> SelectionConfig {
        SelectionConfig::default()
    }

    #[test]
    fn test_baseline_weights_when_no_interval_matches() {
        let weights = derive_tier_weights(&cfg(), 0);
        assert_eq!(weights[&Tier::Tier1], 0.8);
        assert_eq!(weights[&Tier::Tier2], 0.15);
        assert_eq!(weights[&Tier::Tier3], 0.05);
        assert_eq!(weights[&Tier::Lunar], 0.05);
        // Void tiers inherit base * mult.
        assert!((weights[&Tier::VoidTier1] - 0.8 * 0.15).abs() < 1e-12);
        assert!((weights[&Tier::VoidTier3] - 0.05 * 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_uncommon_interval_forces_tier2() {
        // Interval 5 fires at spent = 4, 9, 14, ...
        let weights = derive_tier_weights(&cfg(), 4);
        assert_eq!(weights[&Tier::Tier1], 0.0);
        assert_eq!(weights[&Tier::Tier2], 1.0);
        assert_eq!(weights[&Tier::Tier3], 0.0);
        assert_eq!(weights[&Tier::Lunar], 0.0);
        assert!((weights[&Tier::VoidTier2] - 0.15).abs() < 1e-12);
        assert_eq!(weights[&Tier::VoidTier1], 0.0);
    }

    #[test]
    fn test_larger_interval_wins_tie() {
        // spent = 24 matches both 5 (24 % 5 == 4) and 25 (24 % 25 == 24);
        // the coarser milestone takes precedence.
        let weights = derive_tier_weights(&cfg(), 24);
        assert_eq!(weights[&Tier::Tier3], 1.0);
        assert_eq!(weights[&Tier::Tier2], 0.0);
    }

    #[test]
    fn test_zero_interval_is_disabled() {
        let mut c = cfg();
        c.tier_upgrade_intervals.insert(Tier::Tier2, 0);
        // Without interval 5, spent = 4 matches nothing.
        let weights = derive_tier_weights(&c, 4);
        assert_eq!(weights[&Tier::Tier1], 0.8);
    }

    #[test]
    fn test_item_pool_filters() {
        let catalog = RewardCatalog::new()
            .with(CatalogEntry::item(CandidateId(1), Tier::Tier1, vec![Tag::Damage]))
            .with(CatalogEntry::item(CandidateId(2), Tier::Tier1, vec![]).hidden())
            .with(CatalogEntry::item(CandidateId(3), Tier::Tier1, vec![]).world_unique())
            .with(CatalogEntry::item(CandidateId(4), Tier::Tier1, vec![]).unavailable())
            .with(CatalogEntry::item(CandidateId(5), Tier::Tier1, vec![]))
            .with(CatalogEntry::equipment(CandidateId(6), Tier::Tier1));

        let weights = derive_tier_weights(&cfg(), 0);
        let banished: HashSet<CandidateId> = [CandidateId(5)].into_iter().collect();
        let pool = build_item_pool(&catalog, &weights, &banished);

        let ids: Vec<CandidateId> = pool.values().collect();
        assert_eq!(ids, vec![CandidateId(1)]);
    }

    #[test]
    fn test_item_pool_excludes_zero_weight_tiers() {
        let catalog = RewardCatalog::new()
            .with(CatalogEntry::item(CandidateId(1), Tier::Tier1, vec![]))
            .with(CatalogEntry::item(CandidateId(2), Tier::Tier2, vec![]));

        // Forced uncommon round: tier-1 weight is zero.
        let weights = derive_tier_weights(&cfg(), 4);
        let pool = build_item_pool(&catalog, &weights, &HashSet::new());
        let ids: Vec<CandidateId> = pool.values().collect();
        assert_eq!(ids, vec![CandidateId(2)]);
    }

    #[test]
    fn test_gear_pool_weights_and_filters() {
        let catalog = RewardCatalog::new()
            .with(CatalogEntry::equipment(CandidateId(1), Tier::Tier1))
            .with(CatalogEntry::equipment(CandidateId(2), Tier::Lunar))
            .with(CatalogEntry::equipment(CandidateId(3), Tier::Tier1))
            .with(CatalogEntry::equipment(CandidateId(4), Tier::Tier1))
            .with(CatalogEntry::item(CandidateId(5), Tier::Tier1, vec![]));

        let banished: HashSet<CandidateId> = [CandidateId(4)].into_iter().collect();
        let pool = build_gear_pool(&catalog, &cfg(), &banished, Some(CandidateId(3)));

        let ids: Vec<CandidateId> = pool.values().collect();
        assert_eq!(ids, vec![CandidateId(1), CandidateId(2)]);
        assert_eq!(pool.weight_at(0), 1.0);
        assert_eq!(pool.weight_at(1), 0.5);
    }

    #[test]
    fn test_pools_follow_catalog_order() {
        let catalog = RewardCatalog::new()
            .with(CatalogEntry::item(CandidateId(30), Tier::Tier1, vec![]))
            .with(CatalogEntry::item(CandidateId(10), Tier::Tier1, vec![]))
            .with(CatalogEntry::item(CandidateId(20), Tier::Tier1, vec![]));

        let weights = derive_tier_weights(&cfg(), 0);
        let pool = build_item_pool(&catalog, &weights, &HashSet::new());
        let ids: Vec<u32> = pool.values().map(|id| id.0).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }
}
