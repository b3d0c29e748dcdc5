//! Updraft - Experience-Driven Upgrade Drafting Library
//!
//! Converts accumulated progress into upgrade credits and spends them on
//! weighted, constraint-satisfying batches of reward choices, with a
//! reroll/banish economy per tracked entity. Rendering, networking, and
//! persistence are left to the embedding host.

pub mod catalog;
pub mod config;
pub mod inventory;
pub mod manager;
pub mod progression;
pub mod registry;
pub mod selection;

pub use catalog::{CandidateId, CandidateKind, Catalog, CatalogEntry, RewardCatalog, Tag, Tier};
pub use config::{Config, RunConfig, SelectionConfig};
pub use inventory::{BasicInventory, Inventory};
pub use manager::{ManagerSnapshot, UpgradeError, UpgradeManager};
pub use progression::{ProgressionLedger, ScalingConfig, ScalingPolicy, SAFETY_LEVEL_CAP};
pub use registry::{EntityId, UpgradeRegistry};
pub use selection::{
    generate_round, ConstraintSet, Pick, Rgb, SelectionBatch, SelectionHooks, TagGuarantee,
    TierGroupCap, WeightedPool,
};
