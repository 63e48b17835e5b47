//! `procura-core` — shared building blocks for the planning engine.
//!
//! This crate contains **pure** primitives (no IO, no storage concerns).

pub mod error;
pub mod id;

pub use error::{EngineError, EngineResult};
pub use id::{AllocationId, ItemCode, PoolId, SupplierId};
