//! Run-scoped registry of tracked entities.
//!
//! Owned by whatever drives the run; passed by reference to operations
//! that iterate entities (stage reroll refreshes, shared progress grants,
//! the host clock). No global state.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::inventory::Inventory;
use crate::manager::UpgradeManager;
use crate::selection::hooks::SelectionHooks;

/// Caller-assigned entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Default)]
pub struct UpgradeRegistry {
    managers: HashMap<EntityId, UpgradeManager>,
}

impl UpgradeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity: grants the starting rerolls and generates
    /// its first batch. Re-registering an id replaces the old manager.
    pub fn register(
        &mut self,
        id: EntityId,
        catalog: &impl Catalog,
        cfg: &Config,
        hooks: &SelectionHooks,
        inventory: &impl Inventory,
        rng: &mut impl Rng,
    ) -> &mut UpgradeManager {
        let mut manager = UpgradeManager::new(cfg);
        manager.grant_rerolls(cfg.run.starting_rerolls);
        manager.generate_selection(catalog, cfg, hooks, inventory, rng);
        self.managers.insert(id, manager);
        self.managers.get_mut(&id).expect("just inserted")
    }

    /// Stop tracking an entity, dropping its ledger, banish set, and batch.
    pub fn unregister(&mut self, id: EntityId) -> Option<UpgradeManager> {
        self.managers.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&UpgradeManager> {
        self.managers.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut UpgradeManager> {
        self.managers.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.managers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &UpgradeManager)> {
        self.managers.iter().map(|(&id, m)| (id, m))
    }

    /// Stage-transition refresh: every tracked entity gets `amount` rerolls.
    pub fn grant_rerolls_all(&mut self, amount: u32) {
        for manager in self.managers.values_mut() {
            manager.grant_rerolls(amount);
        }
    }

    /// Shared progress source (e.g. a team-wide objective).
    pub fn add_progress_all(&mut self, amount: u64, cfg: &Config) {
        for manager in self.managers.values_mut() {
            manager.add_progress(amount, cfg);
        }
    }

    /// Advance every entity's clock.
    pub fn tick_all(&mut self, delta_seconds: f64, cfg: &Config) {
        for manager in self.managers.values_mut() {
            manager.tick(delta_seconds, cfg);
        }
    }
}
