use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use procura_core::{AllocationId, EngineError, EngineResult, PoolId, SupplierId};

use crate::pool::SupplierPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedundancyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub supplier_id: SupplierId,
    pub allocated_quantity: i64,
    pub unit_price: f64,
    pub line_cost: f64,
    /// The member's pool weight, in percent.
    pub allocation_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub allocation_id: AllocationId,
    pub pool_id: PoolId,
    pub required_quantity: i64,
    pub lines: Vec<AllocationLine>,
    pub total_cost: f64,
    /// Largest single `allocation_percentage` among the lines, 0 when there are none.
    pub concentration_ratio: f64,
    pub redundancy_level: RedundancyLevel,
    /// `required_quantity - Σ allocated_quantity`; rounding shortfall, never negative.
    pub unallocated_quantity: i64,
}

impl AllocationPlan {
    pub fn allocated_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.allocated_quantity).sum()
    }
}

/// Split `required_quantity` across the pool in proportion to member weights.
///
/// Each member share is rounded independently. A shortfall from rounding is
/// left unallocated and reported; an overshoot is taken back from the
/// lowest-weighted members so the plan never exceeds the requirement.
/// Members whose share rounds to zero get no line.
pub fn allocate(pool: &SupplierPool, required_quantity: i64) -> EngineResult<AllocationPlan> {
    if required_quantity < 0 {
        return Err(EngineError::invalid_input(format!(
            "required quantity cannot be negative ({required_quantity})"
        )));
    }

    let mut quantities: Vec<i64> = pool
        .members
        .iter()
        .map(|m| (required_quantity as f64 * m.allocation_weight / 100.0).round() as i64)
        .collect();

    let mut excess = quantities.iter().sum::<i64>() - required_quantity;
    if excess > 0 {
        let mut order: Vec<usize> = (0..quantities.len()).collect();
        // Lowest weight first; later members first among equal weights.
        order.sort_by(|&a, &b| {
            pool.members[a]
                .allocation_weight
                .total_cmp(&pool.members[b].allocation_weight)
                .then(b.cmp(&a))
        });
        for i in order {
            if excess == 0 {
                break;
            }
            let take = quantities[i].min(excess);
            quantities[i] -= take;
            excess -= take;
        }
    }

    let lines: Vec<AllocationLine> = pool
        .members
        .iter()
        .zip(quantities)
        .filter(|(_, qty)| *qty > 0)
        .map(|(m, qty)| AllocationLine {
            supplier_id: m.supplier_id.clone(),
            allocated_quantity: qty,
            unit_price: m.average_price,
            line_cost: qty as f64 * m.average_price,
            allocation_percentage: m.allocation_weight,
        })
        .collect();

    let total_cost = lines.iter().map(|l| l.line_cost).sum();
    let concentration_ratio = lines
        .iter()
        .map(|l| l.allocation_percentage)
        .fold(0.0, f64::max);

    let redundancy_level = if lines.is_empty() {
        RedundancyLevel::Low
    } else {
        match pool.members.len() {
            0 | 1 => RedundancyLevel::Low,
            2 => RedundancyLevel::Medium,
            _ => RedundancyLevel::High,
        }
    };

    let allocated: i64 = lines.iter().map(|l| l.allocated_quantity).sum();
    let unallocated_quantity = required_quantity - allocated;

    if pool.is_empty() {
        warn!(pool = %pool.pool_id, category = %pool.category, "allocating against an empty supplier pool");
    } else if unallocated_quantity > 0 {
        debug!(
            pool = %pool.pool_id,
            required_quantity,
            unallocated_quantity,
            "rounding left part of the requirement unallocated"
        );
    }

    Ok(AllocationPlan {
        allocation_id: AllocationId::new(),
        pool_id: pool.pool_id,
        required_quantity,
        lines,
        total_cost,
        concentration_ratio,
        redundancy_level,
        unallocated_quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::build_pool_from;
    use crate::pool::tests::{listing, three_supplier_pool};
    use proptest::prelude::*;

    #[test]
    fn three_way_split_matches_weights() {
        let plan = allocate(&three_supplier_pool(), 100).unwrap();

        let quantities: Vec<i64> = plan.lines.iter().map(|l| l.allocated_quantity).collect();
        assert_eq!(quantities, vec![42, 33, 25]);
        assert_eq!(plan.allocated_quantity(), 100);
        assert_eq!(plan.unallocated_quantity, 0);
        assert_eq!(plan.concentration_ratio, 41.7);
        assert_eq!(plan.redundancy_level, RedundancyLevel::High);
    }

    #[test]
    fn line_cost_uses_member_average_price() {
        let plan = allocate(&three_supplier_pool(), 100).unwrap();
        assert_eq!(plan.lines[0].unit_price, 3.0);
        assert_eq!(plan.lines[0].line_cost, 126.0);
        assert_eq!(plan.total_cost, 126.0 + 99.0 + 125.0);
    }

    #[test]
    fn empty_pool_produces_empty_plan() {
        let pool = build_pool_from("fasteners", &[], 3.5).unwrap();
        let plan = allocate(&pool, 100).unwrap();
        assert!(plan.lines.is_empty());
        assert_eq!(plan.total_cost, 0.0);
        assert_eq!(plan.concentration_ratio, 0.0);
        assert_eq!(plan.redundancy_level, RedundancyLevel::Low);
        assert_eq!(plan.unallocated_quantity, 100);
    }

    #[test]
    fn two_members_are_medium_redundancy() {
        let pool = build_pool_from(
            "fasteners",
            &[listing("a", 4.0, &[1.0]), listing("b", 4.0, &[1.0])],
            3.5,
        )
        .unwrap();
        let plan = allocate(&pool, 10).unwrap();
        assert_eq!(plan.redundancy_level, RedundancyLevel::Medium);
        assert_eq!(plan.allocated_quantity(), 10);
    }

    #[test]
    fn zero_share_members_are_omitted() {
        let plan = allocate(&three_supplier_pool(), 1).unwrap();
        // 0.417 -> 0, 0.333 -> 0, 0.25 -> 0
        assert!(plan.lines.is_empty());
        assert_eq!(plan.redundancy_level, RedundancyLevel::Low);
        assert_eq!(plan.unallocated_quantity, 1);
    }

    #[test]
    fn rounding_overshoot_is_trimmed_from_lowest_weight() {
        // Three equal weights of 33.3: each share of 2 rounds to 1, summing to 3.
        let pool = build_pool_from(
            "fasteners",
            &[
                listing("a", 4.0, &[1.0]),
                listing("b", 4.0, &[1.0]),
                listing("c", 4.0, &[1.0]),
            ],
            3.5,
        )
        .unwrap();
        let plan = allocate(&pool, 2).unwrap();
        let ids: Vec<&str> = plan.lines.iter().map(|l| l.supplier_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(plan.allocated_quantity(), 2);
        assert_eq!(plan.unallocated_quantity, 0);
    }

    #[test]
    fn negative_requirement_is_invalid() {
        assert!(matches!(
            allocate(&three_supplier_pool(), -5),
            Err(EngineError::InvalidInput(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn never_allocates_more_than_required(
            ratings in prop::collection::vec(0.5f64..=5.0, 0..8),
            required in 0i64..100_000,
        ) {
            let listings: Vec<_> = ratings
                .iter()
                .enumerate()
                .map(|(i, &r)| listing(&format!("S{i}"), r, &[2.5]))
                .collect();
            let pool = build_pool_from("fasteners", &listings, 0.0).unwrap();
            let plan = allocate(&pool, required).unwrap();

            prop_assert!(plan.allocated_quantity() <= required);
            prop_assert!(plan.unallocated_quantity >= 0);
            prop_assert!(plan.lines.iter().all(|l| l.allocated_quantity > 0));
            prop_assert!((0.0..=100.0).contains(&plan.concentration_ratio));
        }
    }
}
