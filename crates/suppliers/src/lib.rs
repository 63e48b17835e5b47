//! Supplier-side planning: risk scoring, pool selection and order allocation.
//!
//! Pure computations over supplier data supplied by callers through
//! [`SupplierCatalog`]; nothing here performs IO.

pub mod allocation;
pub mod catalog;
pub mod pool;
pub mod risk;

pub use allocation::{AllocationLine, AllocationPlan, RedundancyLevel, allocate};
pub use catalog::{CatalogProduct, SupplierCatalog, SupplierListing, SupplierStatus};
pub use pool::{
    DEFAULT_MINIMUM_RATING, PoolMember, PoolRiskLevel, PriceRange, SupplierPool,
    SupplierPoolBuilder, build_pool_from,
};
pub use risk::{RiskLevel, SupplierPerformanceRecord, SupplierRiskAssessment, score, score_all};
