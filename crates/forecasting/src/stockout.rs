use serde::{Deserialize, Serialize};

use procura_core::{EngineError, EngineResult, ItemCode};

use crate::forecast::ForecastResult;

/// Days of cover per month used when converting a monthly rate.
pub const DAYS_PER_MONTH: f64 = 30.0;

const CRITICAL_DAYS: u32 = 7;
const WARNING_DAYS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockoutStatus {
    Critical,
    Warning,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockoutPriority {
    Urgent,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutAssessment {
    pub item_code: ItemCode,
    pub current_stock: i64,
    /// Units per month.
    pub consumption_rate: f64,
    pub days_remaining: u32,
    pub status: StockoutStatus,
    pub priority: StockoutPriority,
    pub recommendation: String,
}

/// One item to be ranked by [`rank_stockout_risks`].
#[derive(Debug, Clone, PartialEq)]
pub struct StockoutCandidate {
    pub current_stock: i64,
    pub monthly_consumption_rate: f64,
    pub forecast: ForecastResult,
}

impl StockoutCandidate {
    pub fn validate(&self) -> EngineResult<()> {
        validate(self.current_stock, self.monthly_consumption_rate, &self.forecast.item_code)
    }
}

/// Classify how soon an item runs out.
///
/// Returns `Ok(None)` when the consumption rate is zero: an item nobody
/// consumes is not at risk by this rule.
pub fn classify(
    current_stock: i64,
    monthly_consumption_rate: f64,
    forecast: &ForecastResult,
) -> EngineResult<Option<StockoutAssessment>> {
    validate(current_stock, monthly_consumption_rate, &forecast.item_code)?;

    if monthly_consumption_rate == 0.0 {
        return Ok(None);
    }

    // Same as ceil(stock / rate * 30), without the intermediate rounding error.
    let days = (current_stock as f64 * DAYS_PER_MONTH / monthly_consumption_rate).ceil();
    let days_remaining = if days >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        days.max(0.0) as u32
    };

    let monthly_demand = forecast.monthly_demand();
    let (status, priority, recommendation) = if days_remaining < CRITICAL_DAYS {
        (
            StockoutStatus::Critical,
            StockoutPriority::Urgent,
            format!(
                "Place an urgent order now: {days_remaining} days of stock left against a forecast monthly demand of {monthly_demand} units"
            ),
        )
    } else if days_remaining < WARNING_DAYS {
        (
            StockoutStatus::Warning,
            StockoutPriority::High,
            format!(
                "Schedule a reorder this week: {days_remaining} days of stock left against a forecast monthly demand of {monthly_demand} units"
            ),
        )
    } else {
        (
            StockoutStatus::Monitor,
            StockoutPriority::Medium,
            format!("Monitor stock levels: {days_remaining} days of cover remaining"),
        )
    };

    Ok(Some(StockoutAssessment {
        item_code: forecast.item_code.clone(),
        current_stock,
        consumption_rate: monthly_consumption_rate,
        days_remaining,
        status,
        priority,
        recommendation,
    }))
}

/// Classify many items and order them by `days_remaining` ascending.
///
/// Every candidate is validated before any is classified. Items with a zero
/// consumption rate are left out. Ties keep their input order.
pub fn rank_stockout_risks(candidates: &[StockoutCandidate]) -> EngineResult<Vec<StockoutAssessment>> {
    for c in candidates {
        c.validate()?;
    }

    let mut ranked = Vec::with_capacity(candidates.len());
    for c in candidates {
        if let Some(a) = classify(c.current_stock, c.monthly_consumption_rate, &c.forecast)? {
            ranked.push(a);
        }
    }

    // `sort_by_key` is stable.
    ranked.sort_by_key(|a| a.days_remaining);
    Ok(ranked)
}

fn validate(current_stock: i64, monthly_consumption_rate: f64, item_code: &ItemCode) -> EngineResult<()> {
    if current_stock < 0 {
        return Err(EngineError::invalid_input(format!(
            "item {item_code}: current stock cannot be negative ({current_stock})"
        )));
    }
    if !monthly_consumption_rate.is_finite() || monthly_consumption_rate < 0.0 {
        return Err(EngineError::invalid_input(format!(
            "item {item_code}: consumption rate must be a finite non-negative number"
        )));
    }
    Ok(())
}
