//! In-memory collaborators for tests, demos and embedding.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use procura_core::{EngineError, EngineResult, ItemCode};
use procura_forecasting::{CatalogItem, ConsumptionRecord, InventoryCatalog, OrderHistoryReader};
use procura_suppliers::{SupplierCatalog, SupplierListing, SupplierStatus};

fn poisoned<T>(_: T) -> EngineError {
    EngineError::source("in-memory store lock poisoned")
}

#[derive(Debug, Default)]
pub struct InMemoryInventoryCatalog {
    items: RwLock<BTreeMap<ItemCode, CatalogItem>>,
}

impl InMemoryInventoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item, keyed by its product code.
    pub fn upsert(&self, item: CatalogItem) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(item.product_code.clone(), item);
    }
}

impl FromIterator<CatalogItem> for InMemoryInventoryCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        let catalog = Self::new();
        for item in iter {
            catalog.upsert(item);
        }
        catalog
    }
}

impl InventoryCatalog for InMemoryInventoryCatalog {
    fn get_item(&self, code: &ItemCode) -> EngineResult<Option<CatalogItem>> {
        Ok(self.items.read().map_err(poisoned)?.get(code).cloned())
    }

    fn list_items(&self) -> EngineResult<Vec<CatalogItem>> {
        Ok(self.items.read().map_err(poisoned)?.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderHistory {
    records: RwLock<Vec<ConsumptionRecord>>,
}

impl InMemoryOrderHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: ConsumptionRecord) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }
}

impl FromIterator<ConsumptionRecord> for InMemoryOrderHistory {
    fn from_iter<I: IntoIterator<Item = ConsumptionRecord>>(iter: I) -> Self {
        Self {
            records: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl OrderHistoryReader for InMemoryOrderHistory {
    fn get_order_items(
        &self,
        code: &ItemCode,
        since: DateTime<Utc>,
    ) -> EngineResult<Vec<ConsumptionRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.item_code == *code && r.occurred_at >= since)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySupplierCatalog {
    suppliers: RwLock<Vec<SupplierListing>>,
}

impl InMemorySupplierCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listing: SupplierListing) {
        self.suppliers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listing);
    }
}

impl FromIterator<SupplierListing> for InMemorySupplierCatalog {
    fn from_iter<I: IntoIterator<Item = SupplierListing>>(iter: I) -> Self {
        Self {
            suppliers: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl SupplierCatalog for InMemorySupplierCatalog {
    fn get_suppliers(
        &self,
        category: &str,
        status: SupplierStatus,
    ) -> EngineResult<Vec<SupplierListing>> {
        let suppliers = self.suppliers.read().map_err(poisoned)?;
        Ok(suppliers
            .iter()
            .filter(|s| s.status == status && s.carries(category))
            .cloned()
            .collect())
    }
}
