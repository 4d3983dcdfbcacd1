// ==========================================
// FLUPSY 育苗生长预测系统 - 费率表仓储
// ==========================================
// 职责: 读取 growth_rate / mortality_rate 表并构造领域费率表
// 约束: 单位/周期换算在构造时一次完成,引擎只见日增长率
// ==========================================

use crate::domain::rate_table::{GrowthRateTable, MortalityRateTable};
use crate::domain::types::{GrowthRateUnit, Month, MortalityPeriod};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn parse_month(raw: i64, table: &str) -> RepositoryResult<Month> {
    u32::try_from(raw)
        .ok()
        .and_then(Month::from_number)
        .ok_or_else(|| RepositoryError::FieldValueError {
            field: format!("{}.month", table),
            message: format!("月份超出 1..=12: {}", raw),
        })
}

// ==========================================
// RateTableRepository - 费率表仓储
// ==========================================
pub struct RateTableRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RateTableRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 加载生长率表
    ///
    /// # 参数
    /// - `unit`: growth_rate.rate 列的存储单位
    ///
    /// # 返回
    /// - Ok(GrowthRateTable): 已换算为日增长率 (表为空时返回空表)
    /// - Err: 数据库错误 / 月份越界 / 费率无效
    pub fn load_growth_table(&self, unit: GrowthRateUnit) -> RepositoryResult<GrowthRateTable> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT month, rate FROM growth_rate ORDER BY month")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rates = Vec::with_capacity(rows.len());
        for (month, rate) in rows {
            rates.push((parse_month(month, "growth_rate")?, rate));
        }

        let table = GrowthRateTable::from_unit(unit, rates)?;
        if table.is_empty() {
            tracing::warn!("growth_rate 表为空，预测将使用默认日增长率");
        }
        Ok(table)
    }

    /// 加载死亡率表
    ///
    /// # 参数
    /// - `period`: mortality_rate.rate_pct 列的周期语义
    pub fn load_mortality_table(&self, period: MortalityPeriod) -> RepositoryResult<MortalityRateTable> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT month, size_code, rate_pct FROM mortality_rate ORDER BY month, size_code",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rates = Vec::with_capacity(rows.len());
        for (month, size_code, pct) in rows {
            rates.push((parse_month(month, "mortality_rate")?, size_code, pct));
        }

        let table = MortalityRateTable::new(period, rates)?;
        if table.is_empty() {
            tracing::warn!("mortality_rate 表为空，预测将使用默认死亡率");
        }
        Ok(table)
    }
}
