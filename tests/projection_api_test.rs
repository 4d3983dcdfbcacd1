// ==========================================
// ProjectionApi / TimelineApi 集成测试
// ==========================================
// 测试目标: 数据库 → 配置 → 引擎 → API 结果的完整链路
// ==========================================

mod test_helpers;

use flupsy_growth::api::ApiError;
use flupsy_growth::app::AppState;
use flupsy_growth::config::config_keys;
use flupsy_growth::domain::types::{Scenario, ScenarioVariation};
use flupsy_growth::domain::{ProjectionOutcome, ReachOutcome};
use test_helpers::{
    create_test_db, date, insert_config, insert_mortality, insert_snapshot_with_cycle,
    open_test_connection, seed_standard_scenario,
};

fn create_state() -> (tempfile::NamedTempFile, AppState) {
    flupsy_growth::logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    seed_standard_scenario(&conn).expect("Failed to seed");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    (temp_file, state)
}

// ==========================================
// project_horizon
// ==========================================

#[tokio::test]
async fn test_project_horizon_thirty_days() {
    let (_temp_file, state) = create_state();

    let outcome = state
        .projection_api
        .project_horizon("B-01", 30, Some(ScenarioVariation::none()))
        .await
        .unwrap();

    let result = outcome.result().expect("B-01 has a measurement");
    let theoretical = result.scenario(Scenario::Theoretical).unwrap();
    assert_eq!(theoretical.weight_mg, 168.0);
    assert_eq!(theoretical.animals_per_kg, 5_935.0);
    assert_eq!(result.scenarios.len(), 3);
}

#[tokio::test]
async fn test_project_horizon_uses_configured_variation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    seed_standard_scenario(&conn).unwrap();
    insert_config(&conn, config_keys::BEST_VARIATION_PCT, "50").unwrap();
    insert_config(&conn, config_keys::WORST_VARIATION_PCT, "100").unwrap();
    let state = AppState::new(db_path).unwrap();

    let outcome = state
        .projection_api
        .project_horizon("B-01", 30, None)
        .await
        .unwrap();
    let result = outcome.result().unwrap();

    // 最差情景下浮 100% → 增长率为 0
    assert_eq!(result.scenario(Scenario::Worst).unwrap().weight_mg, 125.0);
    assert!(
        result.scenario(Scenario::Best).unwrap().weight_mg
            > result.scenario(Scenario::Theoretical).unwrap().weight_mg
    );
}

#[tokio::test]
async fn test_project_horizon_insufficient_data() {
    let (_temp_file, state) = create_state();

    let outcome = state
        .projection_api
        .project_horizon("B-03", 30, None)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ProjectionOutcome::InsufficientData {
            unit_id: "B-03".to_string()
        }
    );
}

#[tokio::test]
async fn test_project_horizon_errors() {
    let (_temp_file, state) = create_state();
    let api = &state.projection_api;

    let unknown = api.project_horizon("NOPE", 30, None).await.unwrap_err();
    assert_eq!(unknown.status_code(), 404);

    let negative = api.project_horizon("B-01", -1, None).await.unwrap_err();
    assert_eq!(negative.status_code(), 422);

    let too_long = api.project_horizon("B-01", 5_000, None).await.unwrap_err();
    assert!(matches!(too_long, ApiError::InvalidInput(_)));

    let bad_variation = api
        .project_horizon("B-01", 30, Some(ScenarioVariation::new(-5.0, 10.0)))
        .await
        .unwrap_err();
    assert_eq!(bad_variation.status_code(), 422);
}

#[tokio::test]
async fn test_closed_cycle_unit_is_not_found() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    seed_standard_scenario(&conn).unwrap();
    // 已收获: 仅有已结束周期的测量
    insert_snapshot_with_cycle(&conn, "HARVESTED", date(2025, 1, 1), Some(8_000.0), Some(40_000), false)
        .unwrap();
    let state = AppState::new(db_path).unwrap();

    let horizon = state
        .projection_api
        .project_horizon("HARVESTED", 30, None)
        .await
        .unwrap_err();
    assert_eq!(horizon.status_code(), 404);

    let target = state
        .projection_api
        .project_target("HARVESTED", "T5", None)
        .await
        .unwrap_err();
    assert_eq!(target.status_code(), 404);

    // 时间表同样不包含该单元
    let response = state
        .timeline_api
        .build_timeline(&["T5".to_string()], 6, Some(date(2025, 1, 1)))
        .await
        .unwrap();
    assert_eq!(response.unit_count, 3);
}

// ==========================================
// project_target
// ==========================================

#[tokio::test]
async fn test_project_target() {
    let (_temp_file, state) = create_state();

    // 125mg → T3 阈值 ≈166.6mg, 1%/天: ln(1.333)/ln(1.01) ≈ 28.9 → 29 天
    let projection = state
        .projection_api
        .project_target("B-01", "T3", None)
        .await
        .unwrap();
    assert_eq!(projection.outcome.days(), Some(29));
    assert_eq!(projection.outcome.reach_date(), Some(date(2025, 1, 30)));

    // 上限过短 → 不可达 (非错误)
    let capped = state
        .projection_api
        .project_target("B-01", "T3", Some(10))
        .await
        .unwrap();
    assert_eq!(
        capped.outcome,
        ReachOutcome::Unreachable {
            horizon_cap_days: 10
        }
    );
}

#[tokio::test]
async fn test_project_target_errors() {
    let (_temp_file, state) = create_state();
    let api = &state.projection_api;

    let unknown_band = api.project_target("B-01", "T9", None).await.unwrap_err();
    assert_eq!(unknown_band.status_code(), 404);

    let unknown_unit = api.project_target("NOPE", "T3", None).await.unwrap_err();
    assert_eq!(unknown_unit.status_code(), 404);

    let negative_cap = api.project_target("B-01", "T3", Some(-3)).await.unwrap_err();
    assert_eq!(negative_cap.status_code(), 422);
}

// ==========================================
// build_timeline
// ==========================================

#[tokio::test]
async fn test_build_timeline() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    seed_standard_scenario(&conn).unwrap();
    insert_mortality(&conn, 1, "T3", 3.0).unwrap();
    insert_mortality(&conn, 1, "T1", 6.0).unwrap();
    insert_config(&conn, config_keys::MORTALITY_PERIOD, "MONTHLY").unwrap();
    let state = AppState::new(db_path).unwrap();

    let response = state
        .timeline_api
        .build_timeline(
            &["T3".to_string(), "T5".to_string()],
            6,
            Some(date(2025, 1, 1)),
        )
        .await
        .unwrap();

    assert!(!response.report_id.is_empty());
    assert_eq!(response.unit_count, 3);
    assert_eq!(
        response
            .config_snapshot
            .get(config_keys::MORTALITY_PERIOD)
            .map(String::as_str),
        Some("MONTHLY")
    );

    let timeline = &response.timeline;
    assert_eq!(timeline.schedules.len(), 2);
    assert_eq!(timeline.insufficient_data_units, vec!["B-03".to_string()]);

    // B-01 第 29 天进入 → 一月
    let t3 = timeline.schedule("T3").unwrap();
    let january = &t3.entries[0];
    assert_eq!(january.bucket.to_string(), "2025-01");
    assert_eq!(january.unit_ids, vec!["B-01".to_string()]);
    assert!(january.surviving_population < 50_000);
    assert!(january.projected_biomass_kg > 0.0);

    // 排序稳定: 各计划内按时间顺序
    for schedule in &timeline.schedules {
        let buckets: Vec<_> = schedule.entries.iter().map(|e| e.bucket).collect();
        let mut sorted = buckets.clone();
        sorted.sort();
        assert_eq!(buckets, sorted);
    }
}

#[tokio::test]
async fn test_build_timeline_errors() {
    let (_temp_file, state) = create_state();
    let api = &state.timeline_api;

    let empty = api.build_timeline(&[], 6, None).await.unwrap_err();
    assert_eq!(empty.status_code(), 422);

    let zero_months = api
        .build_timeline(&["T3".to_string()], 0, None)
        .await
        .unwrap_err();
    assert_eq!(zero_months.status_code(), 422);

    let too_many_months = api
        .build_timeline(&["T3".to_string()], 36, None)
        .await
        .unwrap_err();
    assert_eq!(too_many_months.status_code(), 422);

    let unknown = api
        .build_timeline(&["XX".to_string()], 6, None)
        .await
        .unwrap_err();
    assert_eq!(unknown.status_code(), 404);
}
