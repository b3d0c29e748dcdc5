//! Extension hooks for the selection round.
//!
//! Each hook point is an ordered list of named functions invoked exactly
//! once per round, in registration order, before any slot is drawn. The
//! explicit ordering makes hook interactions reproducible in tests.

use std::collections::HashMap;

use crate::catalog::{CandidateId, Tier};
use crate::selection::constraints::{TagGuarantee, TierGroupCap};
use crate::selection::pool::WeightedPool;

type Hook<T> = (String, Box<dyn Fn(&mut T)>);

/// The four round hook points, applied in field order.
#[derive(Default)]
pub struct SelectionHooks {
    tier_weight_hooks: Vec<Hook<HashMap<Tier, f64>>>,
    tier_cap_hooks: Vec<Hook<Vec<TierGroupCap>>>,
    guarantee_hooks: Vec<Hook<Vec<TagGuarantee>>>,
    item_pool_hooks: Vec<Hook<WeightedPool<CandidateId>>>,
}

impl SelectionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tier_weights(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut HashMap<Tier, f64>) + 'static,
    ) {
        self.tier_weight_hooks.push((name.into(), Box::new(f)));
    }

    pub fn on_tier_caps(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut Vec<TierGroupCap>) + 'static,
    ) {
        self.tier_cap_hooks.push((name.into(), Box::new(f)));
    }

    pub fn on_guarantees(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut Vec<TagGuarantee>) + 'static,
    ) {
        self.guarantee_hooks.push((name.into(), Box::new(f)));
    }

    pub fn on_item_pool(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut WeightedPool<CandidateId>) + 'static,
    ) {
        self.item_pool_hooks.push((name.into(), Box::new(f)));
    }

    pub fn apply_tier_weights(&self, weights: &mut HashMap<Tier, f64>) {
        for (_, f) in &self.tier_weight_hooks {
            f(weights);
        }
    }

    pub fn apply_tier_caps(&self, caps: &mut Vec<TierGroupCap>) {
        for (_, f) in &self.tier_cap_hooks {
            f(caps);
        }
    }

    pub fn apply_guarantees(&self, guarantees: &mut Vec<TagGuarantee>) {
        for (_, f) in &self.guarantee_hooks {
            f(guarantees);
        }
    }

    pub fn apply_item_pool(&self, pool: &mut WeightedPool<CandidateId>) {
        for (_, f) in &self.item_pool_hooks {
            f(pool);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tier_weight_hooks.is_empty()
            && self.tier_cap_hooks.is_empty()
            && self.guarantee_hooks.is_empty()
            && self.item_pool_hooks.is_empty()
    }
}
