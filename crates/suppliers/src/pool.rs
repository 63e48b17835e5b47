use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use procura_core::{EngineError, EngineResult, PoolId, SupplierId};

use crate::catalog::{SupplierCatalog, SupplierListing, SupplierStatus};

/// Minimum supplier rating used when the caller does not supply one.
pub const DEFAULT_MINIMUM_RATING: f64 = 3.5;

const LOW_RISK_MIN_MEMBERS: usize = 3;
const LOW_RISK_MIN_AVERAGE_RATING: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolRiskLevel {
    Low,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    pub supplier_id: SupplierId,
    pub rating: f64,
    pub on_time_percentage: f64,
    pub price_range: PriceRange,
    /// Mean price over the supplier's products in the pool category.
    pub average_price: f64,
    /// Percentage share in `[0, 100]`, one decimal.
    pub allocation_weight: f64,
}

/// Qualifying suppliers for one category, weighted by rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPool {
    pub pool_id: PoolId,
    pub category: String,
    pub members: Vec<PoolMember>,
    pub average_rating: f64,
    pub average_price: f64,
    pub pool_risk_level: PoolRiskLevel,
}

impl SupplierPool {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.members.iter().map(|m| m.allocation_weight).sum()
    }
}

/// Pool builder wired to the external supplier catalog.
#[derive(Debug, Clone)]
pub struct SupplierPoolBuilder<S> {
    catalog: S,
}

impl<S: SupplierCatalog> SupplierPoolBuilder<S> {
    pub fn new(catalog: S) -> Self {
        Self { catalog }
    }

    /// Build a pool from the ACTIVE suppliers of `category` rated at least `minimum_rating`.
    pub fn build_pool(&self, category: &str, minimum_rating: f64) -> EngineResult<SupplierPool> {
        let listings = self.catalog.get_suppliers(category, SupplierStatus::Active)?;
        build_pool_from(category, &listings, minimum_rating)
    }
}

/// Build a pool from listings already fetched by the caller.
///
/// An empty qualifying set is a valid pool with no members and MEDIUM risk.
/// Listings whose rating lies outside `[0, 5]` are skipped.
pub fn build_pool_from(
    category: &str,
    listings: &[SupplierListing],
    minimum_rating: f64,
) -> EngineResult<SupplierPool> {
    validate(category, minimum_rating)?;

    let qualifying: Vec<&SupplierListing> = listings
        .iter()
        .filter(|s| s.status == SupplierStatus::Active)
        .filter(|s| {
            let valid = (0.0..=5.0).contains(&s.rating);
            if !valid {
                warn!(supplier = %s.supplier_id, rating = s.rating, "skipping supplier: rating outside [0, 5]");
            }
            valid
        })
        .filter(|s| s.rating >= minimum_rating)
        .filter(|s| s.carries(category))
        .collect();

    let rating_sum: f64 = qualifying.iter().map(|s| s.rating).sum();
    let share = |rating: f64| {
        if rating_sum > 0.0 {
            rating / rating_sum * 100.0
        } else {
            // All qualifying ratings are zero: split evenly.
            100.0 / qualifying.len() as f64
        }
    };

    let members: Vec<PoolMember> = qualifying
        .iter()
        .map(|s| {
            let prices: Vec<f64> = s.prices_in(category).collect();
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            PoolMember {
                supplier_id: s.supplier_id.clone(),
                rating: s.rating,
                on_time_percentage: s.on_time_percentage,
                price_range: PriceRange { min, max },
                average_price: prices.iter().sum::<f64>() / prices.len() as f64,
                allocation_weight: round1(share(s.rating)),
            }
        })
        .collect();

    let (average_rating, average_price) = if members.is_empty() {
        warn!(category, minimum_rating, "no qualifying suppliers for pool");
        (0.0, 0.0)
    } else {
        let n = members.len() as f64;
        (
            members.iter().map(|m| m.rating).sum::<f64>() / n,
            members.iter().map(|m| m.average_price).sum::<f64>() / n,
        )
    };

    let pool_risk_level = if members.len() >= LOW_RISK_MIN_MEMBERS
        && average_rating >= LOW_RISK_MIN_AVERAGE_RATING
    {
        PoolRiskLevel::Low
    } else {
        PoolRiskLevel::Medium
    };

    debug!(
        category,
        members = members.len(),
        average_rating,
        risk = ?pool_risk_level,
        "built supplier pool"
    );

    Ok(SupplierPool {
        pool_id: PoolId::new(),
        category: category.to_string(),
        members,
        average_rating,
        average_price,
        pool_risk_level,
    })
}

fn validate(category: &str, minimum_rating: f64) -> EngineResult<()> {
    if category.trim().is_empty() {
        return Err(EngineError::invalid_input("category cannot be empty"));
    }
    if !(0.0..=5.0).contains(&minimum_rating) {
        return Err(EngineError::invalid_input(
            "minimum_rating must be within [0, 5]",
        ));
    }
    Ok(())
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
