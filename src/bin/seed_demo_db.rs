// ==========================================
// FLUPSY 育苗生长预测系统 - 演示数据库生成工具 (开发用)
// ==========================================
// 职责: 写入规格带、费率表与若干单元的测量记录
// 用法: seed_demo_db [db_path] [unit_count]
// 约束: db_path 已存在时先移动为 <db_path>.bak
// ==========================================

use chrono::{Duration, Local};
use flupsy_growth::app::get_default_db_path;
use flupsy_growth::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use std::path::Path;

const DEFAULT_UNIT_COUNT: usize = 24;

// (code, name, min_animals_per_kg, max_animals_per_kg)
const SIZE_BANDS: [(&str, &str, f64, f64); 5] = [
    ("T1", "T1 (19-40k/kg)", 19_001.0, 40_000.0),
    ("T2", "T2 (12-19k/kg)", 12_001.0, 19_000.0),
    ("T3", "T3 (6-12k/kg)", 6_001.0, 12_000.0),
    ("T4", "T4 (4-6k/kg)", 4_001.0, 6_000.0),
    ("T5", "T5 (3-4k/kg)", 3_001.0, 4_000.0),
];

// 日增长率,按 1..=12 月
const DAILY_GROWTH: [f64; 12] = [
    0.008, 0.009, 0.012, 0.016, 0.020, 0.024, 0.026, 0.025, 0.020, 0.015, 0.011, 0.009,
];

// 月死亡率 (%),按规格
const MONTHLY_MORTALITY: [(&str, f64); 5] =
    [("T1", 8.0), ("T2", 6.0), ("T3", 4.0), ("T4", 3.0), ("T5", 2.0)];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    let unit_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_UNIT_COUNT)
        .max(1);

    if Path::new(&db_path).exists() {
        let backup = format!("{}.bak", db_path);
        std::fs::rename(&db_path, &backup)?;
        println!("existing database moved to {}", backup);
    }

    let mut conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed(&mut conn, unit_count)?;

    println!("seeded {} units into {}", unit_count, db_path);
    Ok(())
}

fn seed(conn: &mut Connection, unit_count: usize) -> Result<(), Box<dyn Error>> {
    let tx = conn.transaction()?;

    for (code, name, min, max) in SIZE_BANDS {
        tx.execute(
            "INSERT INTO size_band (code, name, min_animals_per_kg, max_animals_per_kg) VALUES (?1, ?2, ?3, ?4)",
            params![code, name, min, max],
        )?;
    }

    for (index, rate) in DAILY_GROWTH.iter().enumerate() {
        tx.execute(
            "INSERT INTO growth_rate (month, rate) VALUES (?1, ?2)",
            params![index as i64 + 1, rate],
        )?;
    }

    for month in 1..=12_i64 {
        for (code, pct) in MONTHLY_MORTALITY {
            tx.execute(
                "INSERT INTO mortality_rate (month, size_code, rate_pct) VALUES (?1, ?2, ?3)",
                params![month, code, pct],
            )?;
        }
    }

    tx.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', 'mortality_period', 'MONTHLY')",
        [],
    )?;

    let today = Local::now().date_naive();
    for i in 0..unit_count {
        let unit_id = format!("B-{:02}", i + 1);
        // 每公斤只数从 60,000 到 5,000 均匀分布
        let latest_apk = 60_000.0 - (55_000.0 * i as f64 / unit_count.max(2) as f64);
        let population = 40_000 + (i as i64 % 5) * 10_000;
        let latest_on = today - Duration::days((i % 7) as i64);
        let earlier_on = latest_on - Duration::days(14);

        for (measured_on, apk) in [(earlier_on, latest_apk * 1.3), (latest_on, latest_apk)] {
            tx.execute(
                r#"
                INSERT INTO biometric_snapshot
                    (unit_id, cycle_id, cycle_active, measured_on, animals_per_kg, weight_mg, population)
                VALUES (?1, ?2, 1, ?3, ?4, ?5, ?6)
                "#,
                params![
                    unit_id,
                    "CYCLE-DEMO",
                    measured_on,
                    apk,
                    (1_000_000.0 / apk).round(),
                    population
                ],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}
