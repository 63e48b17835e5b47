use serde::{Deserialize, Serialize};

/// Descriptive statistics over a numeric sample.
///
/// An empty sample produces an all-zero summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub average: f64,
    /// Population standard deviation.
    pub std_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub sample_size: usize,
    /// `std_deviation / average`, with a divisor of 1 when the average is zero.
    pub coefficient_of_variation: f64,
}

pub fn summarize(xs: &[f64]) -> Summary {
    if xs.is_empty() {
        return Summary::default();
    }

    let n = xs.len() as f64;
    let average = xs.iter().sum::<f64>() / n;
    let variance = xs
        .iter()
        .map(|x| {
            let d = x - average;
            d * d
        })
        .sum::<f64>()
        / n;
    let std_deviation = variance.sqrt();

    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let divisor = if average != 0.0 { average } else { 1.0 };

    Summary {
        average,
        std_deviation,
        min,
        max,
        sample_size: xs.len(),
        coefficient_of_variation: std_deviation / divisor,
    }
}
