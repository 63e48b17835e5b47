//! `procura-forecasting`
//!
//! **Responsibility:** demand-side planning math.
//!
//! Everything here is deterministic and side-effect free:
//! - Historical records are supplied by callers through [`OrderHistoryReader`].
//! - Results are plain values; nothing is persisted or mutated.

pub mod eoq;
pub mod forecast;
pub mod series;
pub mod source;
pub mod stats;
pub mod stockout;
pub mod trend;

pub use eoq::{EoqBreakdown, compute_eoq, eoq_breakdown};
pub use forecast::{
    DemandForecaster, ForecastResult, HorizonForecast, RiskFlag, RiskKind, Severity,
    forecast_from_records,
};
pub use series::{AggregatedSeries, PeriodBucket, aggregate};
pub use source::{CatalogItem, ConsumptionRecord, InventoryCatalog, OrderHistoryReader};
pub use stats::{Summary, summarize};
pub use stockout::{
    StockoutAssessment, StockoutCandidate, StockoutPriority, StockoutStatus, classify,
    rank_stockout_risks,
};
pub use trend::{growth_rate, seasonality_index};
