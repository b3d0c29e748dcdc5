//! Tunables for selection, leveling, and the run economy.
//!
//! Defaults mirror the balance the system ships with: every 5th upgrade
//! forces an uncommon batch, every 25th a rare batch, at most one lunar and
//! one void item per batch, and an 8-xp first level scaling at 1.4x.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Tier;
use crate::progression::ScalingConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub selection: SelectionConfig,
    pub scaling: ScalingConfig,
    pub run: RunConfig,
}

/// Knobs for one selection round.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Item slots per batch.
    pub selection_size: usize,
    /// Equipment slots per batch.
    pub gear_selection_size: usize,
    /// Baseline per-tier weight table, used when no forced interval matches.
    pub tier_weights: HashMap<Tier, f64>,
    /// Void tiers weigh this fraction of their base tier.
    pub void_weight_mult: f64,
    /// Every n-th level forces a batch of the mapped tier. Larger intervals
    /// win when several match the same level; 0 disables an entry.
    pub tier_upgrade_intervals: HashMap<Tier, u32>,
    /// Per-tier scarcity caps for one batch. Zero entries are ignored.
    pub tier_caps: HashMap<Tier, u32>,
    /// Shared cap across all void tiers.
    pub void_cap: u32,
    /// Whether the Damage/Utility/Healing coverage guarantees are active.
    pub guarantee_categories: bool,
    /// Weight for non-lunar equipment.
    pub base_equip_chance: f64,
    /// Weight for lunar equipment.
    pub base_lunar_equip_chance: f64,
    /// Items of these tiers are granted in multiples on selection.
    pub tier_multipliers: HashMap<Tier, i32>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let mut tier_weights = HashMap::new();
        tier_weights.insert(Tier::Tier1, 0.8);
        tier_weights.insert(Tier::Tier2, 0.15);
        tier_weights.insert(Tier::Tier3, 0.05);
        tier_weights.insert(Tier::Lunar, 0.05);

        let mut tier_upgrade_intervals = HashMap::new();
        tier_upgrade_intervals.insert(Tier::Tier2, 5);
        tier_upgrade_intervals.insert(Tier::Tier3, 25);

        let mut tier_caps = HashMap::new();
        tier_caps.insert(Tier::Lunar, 1);

        Self {
            selection_size: 4,
            gear_selection_size: 1,
            tier_weights,
            void_weight_mult: 0.15,
            tier_upgrade_intervals,
            tier_caps,
            void_cap: 1,
            guarantee_categories: true,
            base_equip_chance: 1.0,
            base_lunar_equip_chance: 0.5,
            tier_multipliers: HashMap::new(),
        }
    }
}

/// Run-wide economy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Rerolls consumed by one banish.
    pub banish_cost: u32,
    /// Rerolls granted when an entity is first registered.
    pub starting_rerolls: u32,
    /// Rerolls granted by `grant_rerolls_all` at each stage transition.
    pub rerolls_per_stage: u32,
    /// When set, `tick` grants one progress unit per elapsed second.
    pub timed_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            banish_cost: 1,
            starting_rerolls: 5,
            rerolls_per_stage: 2,
            timed_progress: false,
        }
    }
}
