//! Economic order quantity with a fixed safety margin.

use serde::{Deserialize, Serialize};

use procura_core::{EngineError, EngineResult};

/// Annual holding cost as a fraction of unit cost, when the caller has no better figure.
pub const DEFAULT_HOLDING_COST_RATE: f64 = 0.25;
/// Fixed uplift applied on top of the textbook EOQ.
pub const EOQ_SAFETY_MULTIPLIER: f64 = 1.2;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EoqBreakdown {
    pub annual_demand: f64,
    pub holding_cost: f64,
    pub eoq: f64,
    /// `ceil(eoq * 1.2)`.
    pub recommended_quantity: u64,
}

pub fn eoq_breakdown(
    average_monthly_consumption: f64,
    ordering_cost: f64,
    holding_cost_rate: f64,
    unit_cost: f64,
) -> EngineResult<EoqBreakdown> {
    for (name, value) in [
        ("average_monthly_consumption", average_monthly_consumption),
        ("ordering_cost", ordering_cost),
        ("holding_cost_rate", holding_cost_rate),
        ("unit_cost", unit_cost),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::invalid_input(format!(
                "{name} must be a finite non-negative number"
            )));
        }
    }

    let annual_demand = average_monthly_consumption * MONTHS_PER_YEAR;
    let holding_cost = unit_cost * holding_cost_rate;
    if holding_cost <= 0.0 {
        return Err(EngineError::invalid_input(
            "holding cost (unit_cost * holding_cost_rate) must be > 0",
        ));
    }

    let eoq = ((2.0 * annual_demand * ordering_cost) / holding_cost).sqrt();
    let recommended = (eoq * EOQ_SAFETY_MULTIPLIER).ceil();

    Ok(EoqBreakdown {
        annual_demand,
        holding_cost,
        eoq,
        recommended_quantity: if recommended >= u64::MAX as f64 {
            u64::MAX
        } else {
            recommended as u64
        },
    })
}

/// Recommended reorder quantity (EOQ plus the 20% margin).
pub fn compute_eoq(
    average_monthly_consumption: f64,
    ordering_cost: f64,
    holding_cost_rate: f64,
    unit_cost: f64,
) -> EngineResult<u64> {
    eoq_breakdown(average_monthly_consumption, ordering_cost, holding_cost_rate, unit_cost)
        .map(|b| b.recommended_quantity)
}
