//! Selection pipeline: weighted pools, scarcity constraints, extension
//! hooks, and the round generator.

pub mod constraints;
pub mod generator;
pub mod hooks;
pub mod pool;
pub mod pool_builder;
pub mod types;

pub use constraints::*;
pub use generator::*;
pub use hooks::*;
pub use pool::*;
pub use pool_builder::*;
pub use types::*;
