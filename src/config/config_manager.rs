// ==========================================
// FLUPSY 育苗生长预测系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取预测引擎配置
// 存储: config_kv 表 (key-value + scope)
// 约束: 缺省或格式错误的配置项回退为默认值,并记录告警
// ==========================================

use crate::config::engine_config::{
    DEFAULT_DAILY_GROWTH_RATE, DEFAULT_HORIZON_CAP_DAYS, DEFAULT_MAX_HORIZON_DAYS,
    DEFAULT_MAX_TIMELINE_MONTHS, DEFAULT_MORTALITY_PCT,
};
use crate::config::projection_config_trait::ProjectionConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::{GrowthRateUnit, MortalityPeriod, ScenarioVariation};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取并解析配置值
    ///
    /// 配置不存在 → 默认值；格式错误 → 默认值 + 告警
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// ProjectionConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ProjectionConfigReader for ConfigManager {
    async fn get_default_daily_growth_rate(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::DEFAULT_DAILY_GROWTH_RATE, DEFAULT_DAILY_GROWTH_RATE)
    }

    async fn get_default_mortality_pct(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::DEFAULT_MORTALITY_PCT, DEFAULT_MORTALITY_PCT)
    }

    async fn get_horizon_cap_days(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::HORIZON_CAP_DAYS, DEFAULT_HORIZON_CAP_DAYS)
    }

    async fn get_max_horizon_days(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::MAX_HORIZON_DAYS, DEFAULT_MAX_HORIZON_DAYS)
    }

    async fn get_max_timeline_months(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::MAX_TIMELINE_MONTHS, DEFAULT_MAX_TIMELINE_MONTHS)
    }

    async fn get_growth_rate_unit(&self) -> ConfigResult<GrowthRateUnit> {
        self.get_parsed_or_default(config_keys::GROWTH_RATE_UNIT, GrowthRateUnit::DailyFraction)
    }

    async fn get_mortality_period(&self) -> ConfigResult<MortalityPeriod> {
        self.get_parsed_or_default(config_keys::MORTALITY_PERIOD, MortalityPeriod::Monthly)
    }

    async fn get_default_variation(&self) -> ConfigResult<ScenarioVariation> {
        let defaults = ScenarioVariation::default();
        let best_pct = self.get_parsed_or_default(config_keys::BEST_VARIATION_PCT, defaults.best_pct)?;
        let worst_pct =
            self.get_parsed_or_default(config_keys::WORST_VARIATION_PCT, defaults.worst_pct)?;
        Ok(ScenarioVariation::new(best_pct, worst_pct))
    }

    async fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(config_map)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 回退常量
    pub const DEFAULT_DAILY_GROWTH_RATE: &str = "default_daily_growth_rate";
    pub const DEFAULT_MORTALITY_PCT: &str = "default_mortality_pct";

    // 上限
    pub const HORIZON_CAP_DAYS: &str = "horizon_cap_days";
    pub const MAX_HORIZON_DAYS: &str = "max_horizon_days";
    pub const MAX_TIMELINE_MONTHS: &str = "max_timeline_months";

    // 费率语义
    pub const GROWTH_RATE_UNIT: &str = "growth_rate_unit";   // DAILY_FRACTION / MONTHLY_PERCENT
    pub const MORTALITY_PERIOD: &str = "mortality_period";   // DAILY / MONTHLY

    // 情景浮动
    pub const BEST_VARIATION_PCT: &str = "best_variation_pct";
    pub const WORST_VARIATION_PCT: &str = "worst_variation_pct";
}
