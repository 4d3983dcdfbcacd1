// ==========================================
// FLUPSY 育苗生长预测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少与采集端并发写入时的偶发 busy 错误
// - 提供预测所需表结构 (测试与初始化工具共用)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 仅用于提示/告警（不做自动迁移）
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 预测引擎读取的表结构
///
/// 说明：
/// - growth_rate.month / mortality_rate.month 为自然月 1..=12
/// - growth_rate.rate 的单位由配置 growth_rate_unit 声明
/// - mortality_rate.rate_pct 的周期由配置 mortality_period 声明
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS size_band (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    min_animals_per_kg REAL NOT NULL,
    max_animals_per_kg REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS growth_rate (
    month INTEGER PRIMARY KEY CHECK (month BETWEEN 1 AND 12),
    rate REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS mortality_rate (
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    size_code TEXT NOT NULL,
    rate_pct REAL NOT NULL,
    PRIMARY KEY (month, size_code)
);

CREATE TABLE IF NOT EXISTS biometric_snapshot (
    snapshot_id INTEGER PRIMARY KEY AUTOINCREMENT,
    unit_id TEXT NOT NULL,
    cycle_id TEXT,
    cycle_active INTEGER NOT NULL DEFAULT 1,
    measured_on TEXT NOT NULL,
    animals_per_kg REAL,
    weight_mg REAL,
    population INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_biometric_unit_date
    ON biometric_snapshot (unit_id, measured_on);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表并登记 schema_version（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 检查 schema_version，与期望不一致时告警
pub fn warn_on_schema_mismatch(conn: &Connection) -> rusqlite::Result<()> {
    match read_schema_version(conn)? {
        Some(v) if v == CURRENT_SCHEMA_VERSION => {}
        Some(v) => tracing::warn!(
            found = v,
            expected = CURRENT_SCHEMA_VERSION,
            "数据库 schema_version 与程序期望不一致"
        ),
        None => tracing::warn!("数据库缺少 schema_version 表"),
    }
    Ok(())
}
