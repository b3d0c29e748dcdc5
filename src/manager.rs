//! Per-entity upgrade manager: the authoritative command surface.
//!
//! All mutating operations are synchronous and arrive on one timeline per
//! entity; rejected commands mutate nothing and keep the current batch.
//! Every accepted selection-affecting command regenerates the whole batch.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{CandidateId, CandidateKind, Catalog};
use crate::config::Config;
use crate::inventory::Inventory;
use crate::progression::ProgressionLedger;
use crate::selection::generator::generate_round;
use crate::selection::hooks::SelectionHooks;
use crate::selection::types::{Pick, SelectionBatch};

/// Recoverable command rejections. None of these mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// Not enough reroll or upgrade credits.
    #[error("insufficient resources")]
    InsufficientResources,
    /// The targeted pick is already in the banish set.
    #[error("candidate is already banished")]
    AlreadyBanished,
    /// Pick index outside the current batch, or nothing there to act on.
    #[error("pick index out of bounds")]
    InvalidIndex,
}

/// Serializable view of everything an observer may need to mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    pub ledger: ProgressionLedger,
    pub banished: Vec<CandidateId>,
    pub selection: SelectionBatch,
}

pub struct UpgradeManager {
    ledger: ProgressionLedger,
    banished: HashSet<CandidateId>,
    selection: SelectionBatch,
    progress_stopwatch: f64,
}

impl UpgradeManager {
    pub fn new(cfg: &Config) -> Self {
        Self {
            ledger: ProgressionLedger::new(&cfg.scaling),
            banished: HashSet::new(),
            selection: SelectionBatch::default(),
            progress_stopwatch: 1.0,
        }
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    pub fn selection(&self) -> &SelectionBatch {
        &self.selection
    }

    pub fn banished(&self) -> &HashSet<CandidateId> {
        &self.banished
    }

    /// Re-derive the batch from current state and replace it atomically.
    pub fn generate_selection(
        &mut self,
        catalog: &impl Catalog,
        cfg: &Config,
        hooks: &SelectionHooks,
        inventory: &impl Inventory,
        rng: &mut impl Rng,
    ) -> &SelectionBatch {
        self.selection = generate_round(
            catalog,
            &cfg.selection,
            hooks,
            self.ledger.spent_upgrades,
            &self.banished,
            inventory.current_equipment(),
            rng,
        );
        &self.selection
    }

    /// Grant progress. Does not regenerate the batch; weights only depend
    /// on spent upgrades. Returns levels gained.
    pub fn add_progress(&mut self, amount: u64, cfg: &Config) -> u32 {
        self.ledger.add_progress(amount, &cfg.scaling)
    }

    pub fn grant_rerolls(&mut self, amount: u32) {
        self.ledger.grant_rerolls(amount);
    }

    /// Spend one reroll and regenerate the whole batch.
    pub fn reroll(
        &mut self,
        catalog: &impl Catalog,
        cfg: &Config,
        hooks: &SelectionHooks,
        inventory: &impl Inventory,
        rng: &mut impl Rng,
    ) -> Result<&SelectionBatch, UpgradeError> {
        if !self.ledger.spend_rerolls(1) {
            return Err(UpgradeError::InsufficientResources);
        }
        Ok(self.generate_selection(catalog, cfg, hooks, inventory, rng))
    }

    /// Permanently exclude the targeted pick from this entity's future
    /// pools, at a reroll cost, and regenerate.
    pub fn banish(
        &mut self,
        index: usize,
        catalog: &impl Catalog,
        cfg: &Config,
        hooks: &SelectionHooks,
        inventory: &impl Inventory,
        rng: &mut impl Rng,
    ) -> Result<&SelectionBatch, UpgradeError> {
        let pick = self.selection.get(index).ok_or(UpgradeError::InvalidIndex)?;
        // A fallback slot holds nothing to banish.
        let id = pick.id.ok_or(UpgradeError::InvalidIndex)?;
        if self.banished.contains(&id) {
            return Err(UpgradeError::AlreadyBanished);
        }
        if !self.ledger.spend_rerolls(cfg.run.banish_cost) {
            return Err(UpgradeError::InsufficientResources);
        }
        self.banished.insert(id);
        Ok(self.generate_selection(catalog, cfg, hooks, inventory, rng))
    }

    /// Spend one upgrade credit on the targeted pick, apply the reward
    /// through the inventory, and regenerate. Selecting does not remove the
    /// reward from future pools.
    pub fn select(
        &mut self,
        index: usize,
        catalog: &impl Catalog,
        cfg: &Config,
        hooks: &SelectionHooks,
        inventory: &mut impl Inventory,
        rng: &mut impl Rng,
    ) -> Result<(Pick, &SelectionBatch), UpgradeError> {
        let pick = *self.selection.get(index).ok_or(UpgradeError::InvalidIndex)?;
        if self.ledger.unspent_upgrades == 0 {
            return Err(UpgradeError::InsufficientResources);
        }

        if let Some(id) = pick.id {
            match catalog.entry(id) {
                Some(entry) if entry.kind == CandidateKind::Item => {
                    let count = match cfg.selection.tier_multipliers.get(&entry.tier) {
                        Some(&mult) if mult <= 0 => {
                            warn!(
                                tier = ?entry.tier,
                                mult, "invalid tier multiplier, defaulting to 1"
                            );
                            1
                        }
                        Some(&mult) => mult as u32,
                        None => 1,
                    };
                    inventory.give_item(id, count);
                }
                Some(_) => inventory.set_equipment(id),
                // Unknown id: nothing to apply, the credit is still spent.
                None => {}
            }
        }

        self.ledger.spend_upgrade();
        Ok((pick, self.generate_selection(catalog, cfg, hooks, inventory, rng)))
    }

    /// Host-driven clock. With timed progress enabled, grants one progress
    /// unit per elapsed second. Returns levels gained.
    pub fn tick(&mut self, delta_seconds: f64, cfg: &Config) -> u32 {
        if !cfg.run.timed_progress || delta_seconds <= 0.0 {
            return 0;
        }
        self.progress_stopwatch -= delta_seconds;
        let mut gained = 0;
        while self.progress_stopwatch <= 0.0 {
            self.progress_stopwatch += 1.0;
            gained += self.ledger.add_progress(1, &cfg.scaling);
        }
        gained
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        let mut banished: Vec<CandidateId> = self.banished.iter().copied().collect();
        banished.sort_unstable();
        ManagerSnapshot {
            ledger: self.ledger.clone(),
            banished,
            selection: self.selection.clone(),
        }
    }

    /// Overwrite observable state from a snapshot (mirror-side sync).
    pub fn restore(&mut self, snapshot: ManagerSnapshot) {
        self.ledger = snapshot.ledger;
        self.banished = snapshot.banished.into_iter().collect();
        self.selection = snapshot.selection;
    }
}
