//! Inventory collaborator: where selected rewards go.
//!
//! The selection core never owns inventory state; it only queries the
//! current equipment for pool filtering and pushes rewards on select.

use std::collections::HashMap;

use crate::catalog::CandidateId;

pub trait Inventory {
    /// Currently equipped gear, excluded from equipment pools.
    fn current_equipment(&self) -> Option<CandidateId>;

    /// Grant `count` copies of an item.
    fn give_item(&mut self, id: CandidateId, count: u32);

    /// Replace the equipped gear.
    fn set_equipment(&mut self, id: CandidateId);
}

/// Minimal map-backed inventory for tests and simple embedders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInventory {
    items: HashMap<CandidateId, u32>,
    equipment: Option<CandidateId>,
}

impl BasicInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self, id: CandidateId) -> u32 {
        self.items.get(&id).copied().unwrap_or(0)
    }

    pub fn total_items(&self) -> u32 {
        self.items.values().sum()
    }
}

impl Inventory for BasicInventory {
    fn current_equipment(&self) -> Option<CandidateId> {
        self.equipment
    }

    fn give_item(&mut self, id: CandidateId, count: u32) {
        *self.items.entry(id).or_insert(0) += count;
    }

    fn set_equipment(&mut self, id: CandidateId) {
        self.equipment = Some(id);
    }
}
