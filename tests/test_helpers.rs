// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use flupsy_growth::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// 种子数据
// ==========================================

/// 插入标准规格带
///
/// T1: 19,001-40,000 只/kg (阈值 ≈52.6mg)
/// T3: 6,001-19,000 只/kg  (阈值 ≈166.6mg)
/// T5: 3,001-6,000 只/kg   (阈值 ≈333.2mg)
pub fn insert_size_bands(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for (code, name, min, max) in [
        ("T1", "T1 (19-40k/kg)", 19_001.0, 40_000.0),
        ("T3", "T3 (6-19k/kg)", 6_001.0, 19_000.0),
        ("T5", "T5 (3-6k/kg)", 3_001.0, 6_000.0),
    ] {
        conn.execute(
            "INSERT INTO size_band (code, name, min_animals_per_kg, max_animals_per_kg) VALUES (?1, ?2, ?3, ?4)",
            params![code, name, min, max],
        )?;
    }
    Ok(())
}

/// 插入 12 个月相同的生长率
pub fn insert_uniform_growth(conn: &Connection, rate: f64) -> Result<(), Box<dyn Error>> {
    for month in 1..=12_i64 {
        conn.execute(
            "INSERT INTO growth_rate (month, rate) VALUES (?1, ?2)",
            params![month, rate],
        )?;
    }
    Ok(())
}

pub fn insert_growth(conn: &Connection, month: i64, rate: f64) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO growth_rate (month, rate) VALUES (?1, ?2)",
        params![month, rate],
    )?;
    Ok(())
}

pub fn insert_mortality(
    conn: &Connection,
    month: i64,
    size_code: &str,
    rate_pct: f64,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO mortality_rate (month, size_code, rate_pct) VALUES (?1, ?2, ?3)",
        params![month, size_code, rate_pct],
    )?;
    Ok(())
}

/// 插入测量快照 (cycle_active = 1)
pub fn insert_snapshot(
    conn: &Connection,
    unit_id: &str,
    measured_on: NaiveDate,
    animals_per_kg: Option<f64>,
    population: Option<i64>,
) -> Result<(), Box<dyn Error>> {
    insert_snapshot_with_cycle(conn, unit_id, measured_on, animals_per_kg, population, true)
}

pub fn insert_snapshot_with_cycle(
    conn: &Connection,
    unit_id: &str,
    measured_on: NaiveDate,
    animals_per_kg: Option<f64>,
    population: Option<i64>,
    cycle_active: bool,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT INTO biometric_snapshot
            (unit_id, cycle_id, cycle_active, measured_on, animals_per_kg, weight_mg, population)
        VALUES (?1, 'C-2025', ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            unit_id,
            cycle_active,
            measured_on,
            animals_per_kg,
            animals_per_kg.map(|apk| (1_000_000.0 / apk).round()),
            population
        ],
    )?;
    Ok(())
}

/// 插入 global 配置
pub fn insert_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// 标准场景: 规格带 + 1%/天 生长率 + 三个单元
///
/// - B-01: 8,000 只/kg (125mg), 50,000 只
/// - B-02: 30,000 只/kg (≈33.3mg), 80,000 只
/// - B-03: 缺少每公斤只数
pub fn seed_standard_scenario(conn: &Connection) -> Result<(), Box<dyn Error>> {
    insert_size_bands(conn)?;
    insert_uniform_growth(conn, 0.01)?;
    insert_snapshot(conn, "B-01", date(2025, 1, 1), Some(8_000.0), Some(50_000))?;
    insert_snapshot(conn, "B-02", date(2025, 1, 1), Some(30_000.0), Some(80_000))?;
    insert_snapshot(conn, "B-03", date(2025, 1, 1), None, Some(20_000))?;
    Ok(())
}
