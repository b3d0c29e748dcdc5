//! Progress accumulation and the leveling curve.
//!
//! Accumulated progress is converted to unspent upgrade credits by walking
//! the threshold curve one level at a time. A single large grant may cross
//! several thresholds in one call; each is recomputed at its own level.

use serde::{Deserialize, Serialize};

/// Bounds the level-up loop against pathological inputs. Reaching it
/// silently stops granting further levels.
pub const SAFETY_LEVEL_CAP: u32 = 9001;

/// How the next-level threshold scales with total level count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingPolicy {
    /// Host-game-like cumulative curve, seeded only by the starting
    /// threshold (the scaling factor settings do not apply).
    Milestone,
    /// `starting * factor^level`.
    Exponential,
    /// `starting * (1 + factor * level)`.
    Linear,
}

/// Growth constant of the milestone curve.
const MILESTONE_GROWTH: f64 = 1.55;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub policy: ScalingPolicy,
    /// Progress required for the first upgrade level.
    pub starting_threshold: f64,
    pub exponential_factor: f64,
    pub linear_factor: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            policy: ScalingPolicy::Exponential,
            starting_threshold: 8.0,
            exponential_factor: 1.4,
            linear_factor: 5.0,
        }
    }
}

impl ScalingConfig {
    /// Threshold that must be exceeded to go from `level` to `level + 1`.
    pub fn threshold_for(&self, level: u32) -> f64 {
        match self.policy {
            ScalingPolicy::Milestone => {
                self.starting_threshold * (MILESTONE_GROWTH.powi(level as i32 + 1) - 1.0)
                    / (MILESTONE_GROWTH - 1.0)
            }
            ScalingPolicy::Exponential => {
                self.starting_threshold * self.exponential_factor.powi(level as i32)
            }
            ScalingPolicy::Linear => {
                self.starting_threshold * (1.0 + self.linear_factor * level as f64)
            }
        }
    }
}

/// Per-entity progression state: upgrade credits, reroll credits, and the
/// current position on the leveling curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionLedger {
    pub spent_upgrades: u32,
    pub unspent_upgrades: u32,
    pub rerolls: u32,
    pub progress: u64,
    pub next_threshold: f64,
    pub prev_threshold: f64,
}

impl ProgressionLedger {
    pub fn new(cfg: &ScalingConfig) -> Self {
        Self {
            spent_upgrades: 0,
            unspent_upgrades: 0,
            rerolls: 0,
            progress: 0,
            next_threshold: cfg.threshold_for(0),
            prev_threshold: 0.0,
        }
    }

    /// Total upgrades ever granted, spent or not.
    pub fn level(&self) -> u32 {
        self.spent_upgrades + self.unspent_upgrades
    }

    /// Accumulate progress and convert it to upgrade credits. Returns the
    /// number of levels gained. `add_progress(0)` is a no-op.
    pub fn add_progress(&mut self, amount: u64, cfg: &ScalingConfig) -> u32 {
        self.progress = self.progress.saturating_add(amount);
        let mut gained = 0;
        while (self.progress as f64) > self.next_threshold && self.level() < SAFETY_LEVEL_CAP {
            self.unspent_upgrades += 1;
            gained += 1;
            self.prev_threshold = self.next_threshold;
            self.next_threshold = cfg.threshold_for(self.level());
        }
        gained
    }

    pub fn grant_rerolls(&mut self, amount: u32) {
        self.rerolls += amount;
    }

    /// Consume `cost` rerolls, or leave everything untouched.
    pub fn spend_rerolls(&mut self, cost: u32) -> bool {
        if self.rerolls < cost {
            return false;
        }
        self.rerolls -= cost;
        true
    }

    /// Convert one unspent upgrade into a spent one.
    pub fn spend_upgrade(&mut self) -> bool {
        if self.unspent_upgrades == 0 {
            return false;
        }
        self.unspent_upgrades -= 1;
        self.spent_upgrades += 1;
        true
    }
}
