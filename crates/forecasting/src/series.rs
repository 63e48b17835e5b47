use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::source::ConsumptionRecord;

/// Length of one aggregation period, in days.
pub const PERIOD_DAYS: i64 = 7;

/// Total consumption in one weekly period.
///
/// `period_index` counts periods back from the reference instant: 0 is the
/// most recent week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period_index: u32,
    pub total_quantity: f64,
}

/// Output of weekly aggregation for one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    /// Buckets ordered by `period_index` ascending (most recent first).
    /// Weeks without any record have no bucket.
    pub buckets: Vec<PeriodBucket>,
    /// Individual record quantities inside the window, in input order.
    pub quantities: Vec<f64>,
}

impl AggregatedSeries {
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Bucket totals in `period_index` order (most recent first), as consumed
    /// by trend estimation.
    pub fn recency_totals(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.total_quantity).collect()
    }
}

/// Group records into weekly buckets keyed by `floor((as_of - occurred_at) / 7 days)`.
///
/// Records older than `lookback_days` are ignored. Records dated after `as_of`
/// are folded into period 0.
pub fn aggregate(
    records: &[ConsumptionRecord],
    as_of: DateTime<Utc>,
    lookback_days: u32,
) -> AggregatedSeries {
    let window_start = as_of - Duration::days(i64::from(lookback_days));
    let period_secs = PERIOD_DAYS * 24 * 60 * 60;

    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    let mut quantities = Vec::with_capacity(records.len());

    for record in records {
        if record.occurred_at < window_start {
            continue;
        }
        let age_secs = (as_of - record.occurred_at).num_seconds().max(0);
        let period = u32::try_from(age_secs / period_secs).unwrap_or(u32::MAX);
        let quantity = record.quantity as f64;

        *totals.entry(period).or_insert(0.0) += quantity;
        quantities.push(quantity);
    }

    AggregatedSeries {
        buckets: totals
            .into_iter()
            .map(|(period_index, total_quantity)| PeriodBucket {
                period_index,
                total_quantity,
            })
            .collect(),
        quantities,
    }
}
