use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{EngineResult, ItemCode, SupplierId};

/// A single historical consumption (order line) for one item.
///
/// Supplied by the application layer; the engine never owns or mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub item_code: ItemCode,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

impl ConsumptionRecord {
    pub fn new(item_code: impl Into<ItemCode>, quantity: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            item_code: item_code.into(),
            quantity,
            occurred_at,
        }
    }
}

/// Inventory catalog entry as exposed by the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub product_code: ItemCode,
    pub product_name: String,
    /// Units currently on hand.
    pub quantity: i64,
    /// Average units consumed per month, as tracked by the catalog.
    pub monthly_consumption: f64,
    pub reorder_point: i64,
    /// Unit purchase cost, used for holding-cost estimation.
    pub unit_cost: f64,
    pub preferred_supplier: Option<SupplierId>,
}

/// Read access to the inventory catalog.
///
/// Implementations live in the application layer (database, cache, fixtures).
pub trait InventoryCatalog: Send + Sync {
    /// Look up a single item. `Ok(None)` means the item does not exist.
    fn get_item(&self, code: &ItemCode) -> EngineResult<Option<CatalogItem>>;

    /// All items currently in the catalog.
    fn list_items(&self) -> EngineResult<Vec<CatalogItem>>;
}

/// Read access to historical order lines.
pub trait OrderHistoryReader: Send + Sync {
    /// Records for `code` that occurred at or after `since`.
    ///
    /// Readers may over-fetch; the forecaster ignores records outside its window.
    fn get_order_items(
        &self,
        code: &ItemCode,
        since: DateTime<Utc>,
    ) -> EngineResult<Vec<ConsumptionRecord>>;
}

impl<T: InventoryCatalog + ?Sized> InventoryCatalog for Arc<T> {
    fn get_item(&self, code: &ItemCode) -> EngineResult<Option<CatalogItem>> {
        (**self).get_item(code)
    }

    fn list_items(&self) -> EngineResult<Vec<CatalogItem>> {
        (**self).list_items()
    }
}

impl<T: OrderHistoryReader + ?Sized> OrderHistoryReader for Arc<T> {
    fn get_order_items(
        &self,
        code: &ItemCode,
        since: DateTime<Utc>,
    ) -> EngineResult<Vec<ConsumptionRecord>> {
        (**self).get_order_items(code, since)
    }
}
