// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 读取、缺省回退与格式错误回退
// ==========================================

mod test_helpers;

use flupsy_growth::config::{config_keys, ConfigManager, EngineConfig, ProjectionConfigReader};
use flupsy_growth::domain::types::{GrowthRateUnit, MortalityPeriod, ScenarioVariation};
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_empty_config_uses_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let config = config_manager.load_engine_config().await.unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[tokio::test]
async fn test_configured_values_are_read() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::DEFAULT_DAILY_GROWTH_RATE, "0.015").unwrap();
    insert_config(&conn, config_keys::HORIZON_CAP_DAYS, "200").unwrap();
    insert_config(&conn, config_keys::GROWTH_RATE_UNIT, "monthly_percent").unwrap();
    insert_config(&conn, config_keys::MORTALITY_PERIOD, "DAILY").unwrap();
    insert_config(&conn, config_keys::BEST_VARIATION_PCT, "10").unwrap();
    insert_config(&conn, config_keys::WORST_VARIATION_PCT, "30").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let config = config_manager.load_engine_config().await.unwrap();

    assert_eq!(config.default_daily_growth_rate, 0.015);
    assert_eq!(config.horizon_cap_days, 200);
    assert_eq!(config.growth_rate_unit, GrowthRateUnit::MonthlyPercent);
    assert_eq!(config.mortality_period, MortalityPeriod::Daily);
    assert_eq!(config.default_variation, ScenarioVariation::new(10.0, 30.0));
}

#[tokio::test]
async fn test_unparsable_value_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::MAX_TIMELINE_MONTHS, "two years").unwrap();
    insert_config(&conn, config_keys::MORTALITY_PERIOD, "WEEKLY").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config_manager.get_max_timeline_months().await.unwrap(), 24);
    assert_eq!(
        config_manager.get_mortality_period().await.unwrap(),
        MortalityPeriod::Monthly
    );
}

#[tokio::test]
async fn test_inconsistent_config_is_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    // 求解上限大于模拟最大天数
    insert_config(&conn, config_keys::HORIZON_CAP_DAYS, "2000").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert!(config_manager.load_engine_config().await.is_err());
}

#[tokio::test]
async fn test_config_snapshot() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::MAX_HORIZON_DAYS, "730").unwrap();
    insert_config(&conn, config_keys::DEFAULT_MORTALITY_PCT, "0.5").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let snapshot = config_manager.get_config_snapshot().await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot.get(config_keys::MAX_HORIZON_DAYS).map(String::as_str),
        Some("730")
    );
    assert_eq!(
        snapshot.get(config_keys::DEFAULT_MORTALITY_PCT).map(String::as_str),
        Some("0.5")
    );
}
