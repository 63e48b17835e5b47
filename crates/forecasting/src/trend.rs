//! Seasonality and growth estimation over weekly bucket totals.
//!
//! Both estimators take totals ordered by period index, most recent week first.

/// Lower clamp for the seasonality multiplier.
pub const SEASONALITY_FLOOR: f64 = 0.8;
/// Upper clamp for the seasonality multiplier.
pub const SEASONALITY_CEILING: f64 = 1.2;
/// Below this many periods the seasonality index is neutral.
pub const MIN_SEASONAL_PERIODS: usize = 4;

const MOVING_AVERAGE_HALF_WIDTH: usize = 2;

/// Seasonality multiplier from a 5-point centered moving average.
///
/// For every index with a full window (`2..=n-3`) the ratio of the observed
/// value to its moving average is taken; the mean ratio is clamped to
/// `[0.8, 1.2]`. Fewer than four periods, or no full window, yields `1.0`.
pub fn seasonality_index(series: &[f64]) -> f64 {
    if series.len() < MIN_SEASONAL_PERIODS {
        return 1.0;
    }

    let w = MOVING_AVERAGE_HALF_WIDTH;
    let mut ratios: Vec<f64> = Vec::new();

    for i in w..series.len().saturating_sub(w) {
        let window = &series[i - w..=i + w];
        let moving_average = window.iter().sum::<f64>() / window.len() as f64;
        let ratio = if moving_average != 0.0 {
            series[i] / moving_average
        } else {
            1.0
        };
        ratios.push(ratio);
    }

    if ratios.is_empty() {
        return 1.0;
    }

    let raw = ratios.iter().sum::<f64>() / ratios.len() as f64;
    if !raw.is_finite() {
        return 1.0;
    }
    raw.clamp(SEASONALITY_FLOOR, SEASONALITY_CEILING)
}

/// Mean period-over-period relative change.
///
/// Pairs whose earlier value is not strictly positive are skipped; with no
/// usable pair the rate is `0.0`.
pub fn growth_rate(series: &[f64]) -> f64 {
    let changes: Vec<f64> = series
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();

    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}
