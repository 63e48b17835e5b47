use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use procura_core::{EngineError, EngineResult, ItemCode};

use crate::series::aggregate;
use crate::source::{ConsumptionRecord, InventoryCatalog, OrderHistoryReader};
use crate::stats::{Summary, summarize};
use crate::trend::{growth_rate, seasonality_index};

/// Two-sided 95% normal quantile.
pub const CONFIDENCE_Z: f64 = 1.96;
pub const CONFIDENCE_LEVEL: f64 = 0.95;
/// Forecast horizons in weekly periods: one week, one month, one quarter.
pub const HORIZONS: [u32; 3] = [1, 4, 12];
/// Horizon treated as "monthly demand" by downstream planning.
pub const MONTHLY_HORIZON: u32 = 4;

const LOW_DATA_THRESHOLD: usize = 5;
const HIGH_VOLATILITY_CV: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskKind {
    LowDataPoints,
    HighVolatility,
    NoConsumption,
}

/// Caveat attached to a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

/// Point forecast and 95% interval for one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonForecast {
    pub periods: u32,
    pub predicted: i64,
    pub lower_bound: i64,
    pub upper_bound: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub item_code: ItemCode,
    pub as_of: DateTime<Utc>,
    pub lookback_days: u32,
    pub historical: Summary,
    /// Always within `[0.8, 1.2]`.
    pub seasonality_index: f64,
    pub growth_rate: f64,
    pub horizons: Vec<HorizonForecast>,
    pub confidence_level: f64,
    pub risks: Vec<RiskFlag>,
}

impl ForecastResult {
    pub fn horizon(&self, periods: u32) -> Option<&HorizonForecast> {
        self.horizons.iter().find(|h| h.periods == periods)
    }

    /// Predicted demand over the monthly horizon, or 0 when absent.
    pub fn monthly_demand(&self) -> i64 {
        self.horizon(MONTHLY_HORIZON).map(|h| h.predicted).unwrap_or(0)
    }

    pub fn has_risk(&self, kind: RiskKind) -> bool {
        self.risks.iter().any(|r| r.kind == kind)
    }
}

/// Forecaster wired to the external catalog and order history.
#[derive(Debug, Clone)]
pub struct DemandForecaster<C, H> {
    catalog: C,
    history: H,
}

impl<C, H> DemandForecaster<C, H>
where
    C: InventoryCatalog,
    H: OrderHistoryReader,
{
    pub fn new(catalog: C, history: H) -> Self {
        Self { catalog, history }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Forecast relative to the current instant.
    pub fn forecast(&self, item_code: &ItemCode, lookback_days: u32) -> EngineResult<ForecastResult> {
        self.forecast_at(item_code, lookback_days, Utc::now())
    }

    /// Forecast relative to `as_of`.
    ///
    /// Fails with `NotFound` when the catalog has no such item. An item with
    /// no history still produces a (zero-valued) forecast.
    pub fn forecast_at(
        &self,
        item_code: &ItemCode,
        lookback_days: u32,
        as_of: DateTime<Utc>,
    ) -> EngineResult<ForecastResult> {
        ensure_lookback(lookback_days)?;

        if self.catalog.get_item(item_code)?.is_none() {
            return Err(EngineError::not_found("item", item_code.as_str()));
        }

        let since = as_of - Duration::days(i64::from(lookback_days));
        let records = self.history.get_order_items(item_code, since)?;
        forecast_from_records(item_code, &records, lookback_days, as_of)
    }
}

/// Forecast from records already fetched by the caller.
pub fn forecast_from_records(
    item_code: &ItemCode,
    records: &[ConsumptionRecord],
    lookback_days: u32,
    as_of: DateTime<Utc>,
) -> EngineResult<ForecastResult> {
    ensure_lookback(lookback_days)?;
    validate_records(item_code, records)?;

    let ahead = records.iter().filter(|r| r.occurred_at > as_of).count();
    if ahead > 0 {
        warn!(item = %item_code, records = ahead, "records dated after the reference time; counted in the current period");
    }

    let series = aggregate(records, as_of, lookback_days);
    let historical = summarize(&series.quantities);
    let totals = series.recency_totals();
    let seasonality = seasonality_index(&totals);
    let growth = growth_rate(&totals);

    debug!(
        item = %item_code,
        samples = historical.sample_size,
        periods = series.buckets.len(),
        seasonality,
        growth,
        "computed demand statistics"
    );

    let horizons = HORIZONS
        .iter()
        .map(|&periods| project(&historical, growth, seasonality, periods))
        .collect();

    Ok(ForecastResult {
        item_code: item_code.clone(),
        as_of,
        lookback_days,
        risks: assess_risks(&historical),
        historical,
        seasonality_index: seasonality,
        growth_rate: growth,
        horizons,
        confidence_level: CONFIDENCE_LEVEL,
    })
}

fn ensure_lookback(lookback_days: u32) -> EngineResult<()> {
    if lookback_days == 0 {
        return Err(EngineError::invalid_input("lookback_days must be > 0"));
    }
    Ok(())
}

fn validate_records(item_code: &ItemCode, records: &[ConsumptionRecord]) -> EngineResult<()> {
    for (i, r) in records.iter().enumerate() {
        if r.item_code != *item_code {
            return Err(EngineError::invalid_input(format!(
                "record {i} belongs to item {} (expected {item_code})",
                r.item_code
            )));
        }
        if r.quantity < 0 {
            return Err(EngineError::invalid_input(format!(
                "record {i} has negative quantity {}",
                r.quantity
            )));
        }
    }
    Ok(())
}

/// `predicted = avg * (1+g) * s * (1+g)^h`, with a ±1.96σ interval.
///
/// Negative projections are clamped to zero before the interval is applied.
fn project(historical: &Summary, growth: f64, seasonality: f64, periods: u32) -> HorizonForecast {
    let factor = 1.0 + growth;
    let raw = historical.average * factor * seasonality * factor.powi(periods as i32);
    let predicted = if raw.is_finite() {
        raw.round().max(0.0)
    } else {
        0.0
    };

    let margin = CONFIDENCE_Z * historical.std_deviation;

    HorizonForecast {
        periods,
        predicted: predicted as i64,
        lower_bound: (predicted - margin).round() as i64,
        upper_bound: (predicted + margin).round() as i64,
    }
}

fn assess_risks(historical: &Summary) -> Vec<RiskFlag> {
    let mut risks = Vec::new();

    if historical.sample_size < LOW_DATA_THRESHOLD {
        risks.push(RiskFlag {
            kind: RiskKind::LowDataPoints,
            severity: Severity::Medium,
            description: format!(
                "only {} historical records in the lookback window",
                historical.sample_size
            ),
            recommendation: "Collect more history or extend the lookback window before relying on this forecast".to_string(),
        });
    }

    if historical.coefficient_of_variation > HIGH_VOLATILITY_CV {
        risks.push(RiskFlag {
            kind: RiskKind::HighVolatility,
            severity: Severity::High,
            description: format!(
                "demand is highly variable (coefficient of variation {:.2})",
                historical.coefficient_of_variation
            ),
            recommendation: "Increase safety stock and review the forecast frequently".to_string(),
        });
    }

    if historical.average == 0.0 {
        risks.push(RiskFlag {
            kind: RiskKind::NoConsumption,
            severity: Severity::High,
            description: "no consumption recorded in the lookback window".to_string(),
            recommendation: "Verify the item is still active; consider discontinuing or reducing stock".to_string(),
        });
    }

    risks
}
