//! `procura-engine`
//!
//! **Responsibility:** wire the pure planning components to their external
//! collaborators (inventory catalog, order history, supplier catalog).
//!
//! The engine performs no IO of its own: collaborators are supplied by the
//! application layer, and every operation is a synchronous computation over
//! what they return.

pub mod config;
pub mod engine;
pub mod memory;

pub use config::EngineConfig;
pub use engine::{PlanningEngine, ReorderSuggestion, ReplenishmentPlan};
pub use memory::{InMemoryInventoryCatalog, InMemoryOrderHistory, InMemorySupplierCatalog};
