use std::sync::Arc;

use serde::{Deserialize, Serialize};

use procura_core::{EngineResult, SupplierId};

/// Supplier lifecycle status as tracked by the supplier catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    Active,
    UnderReview,
    Suspended,
    Inactive,
}

/// A product a supplier offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub category: String,
    pub price: f64,
}

/// Supplier entry as returned by the supplier catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierListing {
    pub supplier_id: SupplierId,
    pub status: SupplierStatus,
    /// 0–5 stars.
    pub rating: f64,
    pub on_time_percentage: f64,
    pub products: Vec<CatalogProduct>,
}

impl SupplierListing {
    /// Prices of the products this supplier carries in `category`.
    pub fn prices_in(&self, category: &str) -> impl Iterator<Item = f64> + '_ {
        let category = category.to_string();
        self.products
            .iter()
            .filter(move |p| p.category == category)
            .map(|p| p.price)
    }

    pub fn carries(&self, category: &str) -> bool {
        self.products.iter().any(|p| p.category == category)
    }
}

/// Read access to the supplier catalog (owned by the application layer).
pub trait SupplierCatalog: Send + Sync {
    fn get_suppliers(
        &self,
        category: &str,
        status: SupplierStatus,
    ) -> EngineResult<Vec<SupplierListing>>;
}

impl<T: SupplierCatalog + ?Sized> SupplierCatalog for Arc<T> {
    fn get_suppliers(
        &self,
        category: &str,
        status: SupplierStatus,
    ) -> EngineResult<Vec<SupplierListing>> {
        (**self).get_suppliers(category, status)
    }
}
