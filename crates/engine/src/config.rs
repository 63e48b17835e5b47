//! Engine configuration.
//!
//! Values come from defaults, the environment (`PROCURA_*`), or a JSON
//! document. Model constants (confidence level, horizons, seasonality clamp,
//! EOQ margin) are fixed in the crates that own them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use procura_core::{EngineError, EngineResult};
use procura_forecasting::eoq::DEFAULT_HOLDING_COST_RATE;
use procura_suppliers::DEFAULT_MINIMUM_RATING;

pub const ENV_LOOKBACK_DAYS: &str = "PROCURA_LOOKBACK_DAYS";
pub const ENV_MIN_SUPPLIER_RATING: &str = "PROCURA_MIN_SUPPLIER_RATING";
pub const ENV_ORDERING_COST: &str = "PROCURA_ORDERING_COST";
pub const ENV_HOLDING_COST_RATE: &str = "PROCURA_HOLDING_COST_RATE";
pub const ENV_BATCH_WORKERS: &str = "PROCURA_BATCH_WORKERS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// History window for forecasts, in days.
    pub lookback_days: u32,
    pub minimum_supplier_rating: f64,
    /// Fixed cost of placing one purchase order.
    pub ordering_cost: f64,
    /// Annual holding cost as a fraction of unit cost.
    pub holding_cost_rate: f64,
    /// Threads used by batch forecasting.
    pub batch_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            minimum_supplier_rating: DEFAULT_MINIMUM_RATING,
            ordering_cost: 50.0,
            holding_cost_rate: DEFAULT_HOLDING_COST_RATE,
            batch_workers: 4,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `PROCURA_*` variables that parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], reading through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            lookback_days: read_or(&lookup, ENV_LOOKBACK_DAYS, d.lookback_days),
            minimum_supplier_rating: read_or(
                &lookup,
                ENV_MIN_SUPPLIER_RATING,
                d.minimum_supplier_rating,
            ),
            ordering_cost: read_or(&lookup, ENV_ORDERING_COST, d.ordering_cost),
            holding_cost_rate: read_or(&lookup, ENV_HOLDING_COST_RATE, d.holding_cost_rate),
            batch_workers: read_or(&lookup, ENV_BATCH_WORKERS, d.batch_workers),
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::invalid_input(format!("engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.lookback_days == 0 {
            return Err(EngineError::invalid_input("lookback_days must be > 0"));
        }
        if self.batch_workers == 0 {
            return Err(EngineError::invalid_input("batch_workers must be > 0"));
        }
        if !(0.0..=5.0).contains(&self.minimum_supplier_rating) {
            return Err(EngineError::invalid_input(
                "minimum_supplier_rating must be within [0, 5]",
            ));
        }
        if !(self.ordering_cost.is_finite() && self.ordering_cost >= 0.0) {
            return Err(EngineError::invalid_input("ordering_cost must be >= 0"));
        }
        if !(self.holding_cost_rate.is_finite() && self.holding_cost_rate > 0.0) {
            return Err(EngineError::invalid_input("holding_cost_rate must be > 0"));
        }
        Ok(())
    }
}

fn read_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparsable configuration value; using default");
            default
        }),
    }
}
