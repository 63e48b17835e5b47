use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use procura_core::{EngineError, ItemCode, SupplierId};
use procura_engine::{
    EngineConfig, InMemoryInventoryCatalog, InMemoryOrderHistory, InMemorySupplierCatalog,
    PlanningEngine,
};
use procura_forecasting::{CatalogItem, ConsumptionRecord, RiskKind, StockoutStatus};
use procura_suppliers::{
    CatalogProduct, RedundancyLevel, RiskLevel, SupplierListing, SupplierPerformanceRecord,
    SupplierStatus,
};

type Engine = PlanningEngine<
    Arc<InMemoryInventoryCatalog>,
    Arc<InMemoryOrderHistory>,
    Arc<InMemorySupplierCatalog>,
>;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn item(code: &str, stock: i64, monthly: f64, reorder_point: i64) -> CatalogItem {
    CatalogItem {
        product_code: ItemCode::from(code),
        product_name: format!("{code} product"),
        quantity: stock,
        monthly_consumption: monthly,
        reorder_point,
        unit_cost: 10.0,
        preferred_supplier: Some(SupplierId::from("S5")),
    }
}

fn supplier(id: &str, rating: f64, price: f64) -> SupplierListing {
    SupplierListing {
        supplier_id: SupplierId::from(id),
        status: SupplierStatus::Active,
        rating,
        on_time_percentage: 92.0,
        products: vec![CatalogProduct {
            category: "fasteners".to_string(),
            price,
        }],
    }
}

fn engine() -> Engine {
    procura_observability::init();

    let catalog: InMemoryInventoryCatalog = vec![
        item("BOLT", 50, 300.0, 100),
        item("NUT", 400, 300.0, 100),
        item("WASHER", 100, 300.0, 50),
        item("IDLE", 10, 0.0, 10),
    ]
    .into_iter()
    .collect();

    // Ten weeks of 25 bolts per week; one order per week.
    let history: InMemoryOrderHistory = (0..10)
        .map(|week| ConsumptionRecord::new("BOLT", 25, as_of() - Duration::days(week * 7 + 1)))
        .collect();

    let suppliers: InMemorySupplierCatalog = vec![
        supplier("S5", 5.0, 2.0),
        supplier("S4", 4.0, 3.0),
        supplier("S3", 3.0, 4.0),
    ]
    .into_iter()
    .collect();

    let config = EngineConfig {
        minimum_supplier_rating: 3.0,
        batch_workers: 2,
        ..EngineConfig::default()
    };

    PlanningEngine::new(Arc::new(catalog), Arc::new(history), Arc::new(suppliers), config).unwrap()
}

#[test]
fn forecast_of_steady_item() {
    let engine = engine();
    let f = engine.forecast_at(&ItemCode::from("BOLT"), 90, as_of()).unwrap();

    assert_eq!(f.historical.average, 25.0);
    assert_eq!(f.historical.sample_size, 10);
    assert_eq!(f.growth_rate, 0.0);
    assert_eq!(f.seasonality_index, 1.0);
    assert_eq!(f.monthly_demand(), 25);
    assert!(f.risks.is_empty());
}

#[test]
fn item_without_history_forecasts_zero() {
    let engine = engine();
    let f = engine.forecast_at(&ItemCode::from("NUT"), 90, as_of()).unwrap();
    assert_eq!(f.monthly_demand(), 0);
    assert!(f.has_risk(RiskKind::NoConsumption));
}

#[test]
fn unknown_item_is_not_found() {
    let engine = engine();
    let err = engine.forecast_at(&ItemCode::from("GHOST"), 90, as_of()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn batch_keeps_input_order_and_isolates_failures() {
    let engine = engine();
    let items: Vec<ItemCode> = ["NUT", "GHOST", "BOLT", "WASHER", "IDLE"]
        .into_iter()
        .map(ItemCode::from)
        .collect();

    let results = engine.forecast_batch_at(&items, 90, as_of());

    let codes: Vec<&str> = results.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(codes, vec!["NUT", "GHOST", "BOLT", "WASHER", "IDLE"]);
    assert!(matches!(results[1].1, Err(EngineError::NotFound { .. })));
    assert_eq!(results[2].1.as_ref().unwrap().monthly_demand(), 25);
    assert_eq!(results.iter().filter(|(_, r)| r.is_ok()).count(), 4);
}

#[test]
fn stockout_risks_are_ranked_and_exclude_idle_items() {
    let engine = engine();
    let risks = engine.stockout_risks_at(as_of()).unwrap();

    let codes: Vec<&str> = risks.iter().map(|a| a.item_code.as_str()).collect();
    assert_eq!(codes, vec!["BOLT", "WASHER", "NUT"]);

    assert_eq!(risks[0].days_remaining, 5);
    assert_eq!(risks[0].status, StockoutStatus::Critical);
    assert_eq!(risks[1].days_remaining, 10);
    assert_eq!(risks[1].status, StockoutStatus::Warning);
    assert_eq!(risks[2].days_remaining, 40);
    assert_eq!(risks[2].status, StockoutStatus::Monitor);
}

#[test]
fn reorder_suggestions_cover_items_below_reorder_point() {
    let engine = engine();
    let suggestions = engine.reorder_suggestions_at(as_of()).unwrap();

    let codes: Vec<&str> = suggestions.iter().map(|s| s.item_code.as_str()).collect();
    // IDLE sits exactly at its reorder point but has no demand, so its EOQ is zero.
    assert_eq!(codes, vec!["BOLT", "IDLE"]);

    let bolt = &suggestions[0];
    // annual 3600, holding 2.5: sqrt(2*3600*50/2.5) = 379.47 -> *1.2 = 455.4 -> 456
    assert_eq!(bolt.recommended_quantity, 456);
    assert_eq!(bolt.forecast_monthly_demand, 25);
    assert_eq!(bolt.preferred_supplier, Some(SupplierId::from("S5")));
    assert_eq!(suggestions[1].recommended_quantity, 0);
}

#[test]
fn replenishment_splits_forecast_across_pool() {
    let engine = engine();
    let plan = engine
        .plan_replenishment_at(&ItemCode::from("BOLT"), "fasteners", as_of())
        .unwrap();

    assert_eq!(plan.pool.members.len(), 3);
    assert_eq!(plan.allocation.required_quantity, 25);
    assert!(plan.allocation.allocated_quantity() <= 25);
    assert_eq!(plan.allocation.redundancy_level, RedundancyLevel::High);
    assert_eq!(plan.allocation.concentration_ratio, 41.7);
}

#[test]
fn pool_for_unknown_category_is_empty() {
    let engine = engine();
    let pool = engine.build_pool("paint").unwrap();
    assert!(pool.is_empty());

    let plan = engine.allocate(&pool, 40).unwrap();
    assert!(plan.lines.is_empty());
    assert_eq!(plan.total_cost, 0.0);
    assert_eq!(plan.redundancy_level, RedundancyLevel::Low);
}

#[test]
fn supplier_assessment_report() {
    let engine = engine();
    let records = vec![
        SupplierPerformanceRecord {
            supplier_id: SupplierId::from("steady"),
            overall_rating: 4.6,
            on_time_percentage: 97.0,
            defective_item_count: 1,
            total_orders: 40,
            status: SupplierStatus::Active,
        },
        SupplierPerformanceRecord {
            supplier_id: SupplierId::from("late"),
            overall_rating: 2.0,
            on_time_percentage: 70.0,
            defective_item_count: 0,
            total_orders: 10,
            status: SupplierStatus::Active,
        },
    ];

    let report = engine.assess_suppliers(&records).unwrap();
    assert_eq!(report[0].supplier_id.as_str(), "late");
    assert_eq!(report[0].risk_score, 45);
    assert_eq!(report[0].risk_level, RiskLevel::High);
    assert_eq!(report[1].risk_level, RiskLevel::Low);
}

#[test]
fn invalid_config_is_rejected() {
    let config = EngineConfig {
        lookback_days: 0,
        ..EngineConfig::default()
    };
    let err = PlanningEngine::new(
        Arc::new(InMemoryInventoryCatalog::new()),
        Arc::new(InMemoryOrderHistory::new()),
        Arc::new(InMemorySupplierCatalog::new()),
        config,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn results_serialize_for_the_application_layer() {
    let engine = engine();
    let risks = engine.stockout_risks_at(as_of()).unwrap();
    let json = serde_json::to_value(&risks[0]).unwrap();
    assert_eq!(json["item_code"], "BOLT");
    assert_eq!(json["status"], "CRITICAL");
}

#[test]
fn record_written_just_ahead_of_now_keeps_item_ranked() {
    procura_observability::init();

    let catalog: InMemoryInventoryCatalog = vec![item("BOLT", 50, 300.0, 100)].into_iter().collect();
    let now = Utc::now();
    let history: InMemoryOrderHistory = vec![
        ConsumptionRecord::new("BOLT", 20, now - Duration::days(2)),
        ConsumptionRecord::new("BOLT", 30, now + Duration::seconds(5)),
    ]
    .into_iter()
    .collect();

    let engine = PlanningEngine::new(
        Arc::new(catalog),
        Arc::new(history),
        Arc::new(InMemorySupplierCatalog::new()),
        EngineConfig::default(),
    )
    .unwrap();

    let forecast = engine.forecast(&ItemCode::from("BOLT")).unwrap();
    assert_eq!(forecast.historical.sample_size, 2);

    let risks = engine.stockout_risks().unwrap();
    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0].item_code.as_str(), "BOLT");
    assert_eq!(risks[0].status, StockoutStatus::Critical);
}
