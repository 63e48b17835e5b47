//! Additive supplier risk scoring.
//!
//! Points accumulate independently per triggered factor; the sum is banded
//! into a level. Mitigation actions are a fixed lookup.

use serde::{Deserialize, Serialize};

use procura_core::{EngineError, EngineResult, SupplierId};

use crate::catalog::SupplierStatus;

const DELAY_POINTS: u32 = 20;
const QUALITY_POINTS: u32 = 20;
const LOW_RATING_POINTS: u32 = 25;
const UNDER_REVIEW_POINTS: u32 = 15;
const LIMITED_HISTORY_POINTS: u32 = 10;

const ON_TIME_THRESHOLD: f64 = 80.0;
const DEFECT_THRESHOLD: u32 = 5;
const RATING_THRESHOLD: f64 = 3.0;
const ORDER_HISTORY_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPerformanceRecord {
    pub supplier_id: SupplierId,
    /// 0–5.
    pub overall_rating: f64,
    /// 0–100.
    pub on_time_percentage: f64,
    pub defective_item_count: u32,
    pub total_orders: u32,
    pub status: SupplierStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            60.. => RiskLevel::Critical,
            40..=59 => RiskLevel::High,
            20..=39 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRiskAssessment {
    pub supplier_id: SupplierId,
    /// 0–100.
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub mitigation_actions: Vec<String>,
}

pub fn score(record: &SupplierPerformanceRecord) -> EngineResult<SupplierRiskAssessment> {
    validate(record)?;

    let mut points = 0u32;
    let mut factors: Vec<String> = Vec::new();
    let mut actions: Vec<String> = Vec::new();

    let mut trigger = |hit: bool, add: u32, factor: &str, action: &str| {
        if hit {
            points += add;
            factors.push(factor.to_string());
            actions.push(action.to_string());
        }
    };

    trigger(
        record.on_time_percentage < ON_TIME_THRESHOLD,
        DELAY_POINTS,
        "Delivery delays",
        "Agree firm delivery windows with penalty clauses",
    );
    trigger(
        record.defective_item_count > DEFECT_THRESHOLD,
        QUALITY_POINTS,
        "Quality issues",
        "Tighten incoming quality inspection",
    );
    trigger(
        record.overall_rating < RATING_THRESHOLD,
        LOW_RATING_POINTS,
        "Low rating",
        "Schedule a supplier performance review",
    );
    trigger(
        record.status == SupplierStatus::UnderReview,
        UNDER_REVIEW_POINTS,
        "Supplier under review",
        "Hold new contracts until the review closes",
    );
    trigger(
        record.total_orders < ORDER_HISTORY_THRESHOLD,
        LIMITED_HISTORY_POINTS,
        "Limited order history",
        "Start with smaller trial orders",
    );

    let risk_score = points.min(100);
    let risk_level = RiskLevel::from_score(risk_score);

    let level_actions: &[&str] = match risk_level {
        RiskLevel::Critical => &["Reduce order volume immediately", "Activate backup supplier"],
        RiskLevel::High => &["Identify alternative suppliers", "Increase monitoring frequency"],
        RiskLevel::Medium => &["Monitor performance monthly"],
        RiskLevel::Low if factors.is_empty() => &["Continue standard monitoring"],
        RiskLevel::Low => &[],
    };
    actions.extend(level_actions.iter().map(|a| a.to_string()));

    Ok(SupplierRiskAssessment {
        supplier_id: record.supplier_id.clone(),
        risk_score,
        risk_level,
        risk_factors: factors,
        mitigation_actions: actions,
    })
}

/// Score every record and sort by descending risk score (ties keep input order).
pub fn score_all(records: &[SupplierPerformanceRecord]) -> EngineResult<Vec<SupplierRiskAssessment>> {
    let mut out = records.iter().map(score).collect::<EngineResult<Vec<_>>>()?;
    out.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    Ok(out)
}

fn validate(record: &SupplierPerformanceRecord) -> EngineResult<()> {
    if !(0.0..=5.0).contains(&record.overall_rating) {
        return Err(EngineError::invalid_input(format!(
            "supplier {}: overall_rating must be within [0, 5]",
            record.supplier_id
        )));
    }
    if !(0.0..=100.0).contains(&record.on_time_percentage) {
        return Err(EngineError::invalid_input(format!(
            "supplier {}: on_time_percentage must be within [0, 100]",
            record.supplier_id
        )));
    }
    Ok(())
}
