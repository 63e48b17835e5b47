use std::thread;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use procura_core::{EngineError, EngineResult, ItemCode, SupplierId};
use procura_forecasting::{
    DemandForecaster, ForecastResult, InventoryCatalog, OrderHistoryReader, StockoutAssessment,
    StockoutCandidate, compute_eoq, rank_stockout_risks,
};
use procura_suppliers::{
    AllocationPlan, SupplierCatalog, SupplierPerformanceRecord, SupplierPool, SupplierPoolBuilder,
    SupplierRiskAssessment, allocate, score_all,
};

use crate::config::EngineConfig;

/// Reorder proposal for an item at or below its reorder point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderSuggestion {
    pub item_code: ItemCode,
    pub product_name: String,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub forecast_monthly_demand: i64,
    /// EOQ including the fixed safety margin.
    pub recommended_quantity: u64,
    pub preferred_supplier: Option<SupplierId>,
}

/// Forecast-driven order split for one item across a category pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPlan {
    pub forecast: ForecastResult,
    pub pool: SupplierPool,
    pub allocation: AllocationPlan,
}

/// Facade over the forecasting and supplier components.
///
/// Holds no mutable state; every call is independent and may run concurrently
/// with any other.
#[derive(Debug)]
pub struct PlanningEngine<C, H, S> {
    forecaster: DemandForecaster<C, H>,
    pools: SupplierPoolBuilder<S>,
    config: EngineConfig,
}

impl<C, H, S> PlanningEngine<C, H, S>
where
    C: InventoryCatalog,
    H: OrderHistoryReader,
    S: SupplierCatalog,
{
    pub fn new(catalog: C, history: H, suppliers: S, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            forecaster: DemandForecaster::new(catalog, history),
            pools: SupplierPoolBuilder::new(suppliers),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast one item over the configured lookback window.
    pub fn forecast(&self, item_code: &ItemCode) -> EngineResult<ForecastResult> {
        self.forecaster.forecast(item_code, self.config.lookback_days)
    }

    pub fn forecast_at(
        &self,
        item_code: &ItemCode,
        lookback_days: u32,
        as_of: DateTime<Utc>,
    ) -> EngineResult<ForecastResult> {
        self.forecaster.forecast_at(item_code, lookback_days, as_of)
    }

    /// Forecast many items on up to `batch_workers` threads.
    ///
    /// Results come back in input order, one per item; a failing item never
    /// affects the others.
    pub fn forecast_batch_at(
        &self,
        items: &[ItemCode],
        lookback_days: u32,
        as_of: DateTime<Utc>,
    ) -> Vec<(ItemCode, EngineResult<ForecastResult>)> {
        if items.is_empty() {
            return Vec::new();
        }

        let workers = self.config.batch_workers.clamp(1, items.len());
        let chunk_size = items.len().div_ceil(workers);
        info!(items = items.len(), workers, lookback_days, "batch forecast started");

        let results: Vec<(ItemCode, EngineResult<ForecastResult>)> = thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|code| self.forecast_at(code, lookback_days, as_of))
                            .collect::<Vec<_>>()
                    });
                    (chunk, handle)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(chunk, handle)| {
                    let outcomes = handle.join().unwrap_or_else(|_| {
                        warn!(items = chunk.len(), "batch forecast worker panicked");
                        chunk
                            .iter()
                            .map(|_| Err(EngineError::source("forecast worker panicked")))
                            .collect()
                    });
                    chunk.iter().cloned().zip(outcomes)
                })
                .collect()
        });

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!(items = items.len(), failed, "batch forecast finished");
        results
    }

    pub fn forecast_batch(&self, items: &[ItemCode]) -> Vec<(ItemCode, EngineResult<ForecastResult>)> {
        self.forecast_batch_at(items, self.config.lookback_days, Utc::now())
    }

    /// Stockout assessment for every catalog item that is being consumed,
    /// soonest stockout first.
    ///
    /// Items that cannot be forecast or carry invalid stock figures are logged
    /// and skipped.
    pub fn stockout_risks_at(&self, as_of: DateTime<Utc>) -> EngineResult<Vec<StockoutAssessment>> {
        let items = self.forecaster.catalog().list_items()?;
        let mut candidates = Vec::with_capacity(items.len());

        for item in items {
            let forecast = match self.forecast_at(&item.product_code, self.config.lookback_days, as_of) {
                Ok(f) => f,
                Err(e) => {
                    warn!(item = %item.product_code, error = %e, "skipping item: forecast failed");
                    continue;
                }
            };
            let candidate = StockoutCandidate {
                current_stock: item.quantity,
                monthly_consumption_rate: item.monthly_consumption,
                forecast,
            };
            if let Err(e) = candidate.validate() {
                warn!(item = %item.product_code, error = %e, "skipping item: invalid stock figures");
                continue;
            }
            candidates.push(candidate);
        }

        let ranked = rank_stockout_risks(&candidates)?;
        debug!(assessed = ranked.len(), "stockout risks ranked");
        Ok(ranked)
    }

    pub fn stockout_risks(&self) -> EngineResult<Vec<StockoutAssessment>> {
        self.stockout_risks_at(Utc::now())
    }

    /// EOQ-based reorder proposals for items at or below their reorder point.
    ///
    /// The catalog's monthly consumption drives the EOQ; when the catalog has
    /// none, the forecast monthly demand is used instead.
    pub fn reorder_suggestions_at(&self, as_of: DateTime<Utc>) -> EngineResult<Vec<ReorderSuggestion>> {
        let items = self.forecaster.catalog().list_items()?;
        let mut suggestions = Vec::new();

        for item in items.into_iter().filter(|i| i.quantity <= i.reorder_point) {
            let forecast = match self.forecast_at(&item.product_code, self.config.lookback_days, as_of) {
                Ok(f) => f,
                Err(e) => {
                    warn!(item = %item.product_code, error = %e, "skipping item: forecast failed");
                    continue;
                }
            };
            let monthly_demand = forecast.monthly_demand();
            let consumption = if item.monthly_consumption > 0.0 {
                item.monthly_consumption
            } else {
                monthly_demand as f64
            };

            let recommended_quantity = match compute_eoq(
                consumption,
                self.config.ordering_cost,
                self.config.holding_cost_rate,
                item.unit_cost,
            ) {
                Ok(q) => q,
                Err(e) => {
                    warn!(item = %item.product_code, error = %e, "skipping item: EOQ not computable");
                    continue;
                }
            };

            suggestions.push(ReorderSuggestion {
                item_code: item.product_code,
                product_name: item.product_name,
                current_stock: item.quantity,
                reorder_point: item.reorder_point,
                forecast_monthly_demand: monthly_demand,
                recommended_quantity,
                preferred_supplier: item.preferred_supplier,
            });
        }

        Ok(suggestions)
    }

    pub fn reorder_suggestions(&self) -> EngineResult<Vec<ReorderSuggestion>> {
        self.reorder_suggestions_at(Utc::now())
    }

    /// Risk assessments, riskiest supplier first.
    pub fn assess_suppliers(
        &self,
        records: &[SupplierPerformanceRecord],
    ) -> EngineResult<Vec<SupplierRiskAssessment>> {
        score_all(records)
    }

    /// Pool for `category` using the configured minimum rating.
    pub fn build_pool(&self, category: &str) -> EngineResult<SupplierPool> {
        self.pools
            .build_pool(category, self.config.minimum_supplier_rating)
    }

    pub fn build_pool_with(&self, category: &str, minimum_rating: f64) -> EngineResult<SupplierPool> {
        self.pools.build_pool(category, minimum_rating)
    }

    pub fn allocate(&self, pool: &SupplierPool, required_quantity: i64) -> EngineResult<AllocationPlan> {
        allocate(pool, required_quantity)
    }

    /// Forecast the item, then split its monthly demand across the category pool.
    pub fn plan_replenishment_at(
        &self,
        item_code: &ItemCode,
        category: &str,
        as_of: DateTime<Utc>,
    ) -> EngineResult<ReplenishmentPlan> {
        let forecast = self.forecast_at(item_code, self.config.lookback_days, as_of)?;
        let pool = self.build_pool(category)?;
        let allocation = allocate(&pool, forecast.monthly_demand())?;

        info!(
            item = %item_code,
            category,
            required = allocation.required_quantity,
            lines = allocation.lines.len(),
            "replenishment planned"
        );

        Ok(ReplenishmentPlan {
            forecast,
            pool,
            allocation,
        })
    }

    pub fn plan_replenishment(&self, item_code: &ItemCode, category: &str) -> EngineResult<ReplenishmentPlan> {
        self.plan_replenishment_at(item_code, category, Utc::now())
    }
}
