//! Leveling curve and per-entity progression state.

pub mod ledger;

pub use ledger::*;
