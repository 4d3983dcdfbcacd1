// ==========================================
// FLUPSY 育苗生长预测系统 - 生物测量数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只读
// ==========================================

use crate::domain::biometric::BiometricSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SNAPSHOT_COLUMNS: &str =
    "unit_id, cycle_id, measured_on, animals_per_kg, weight_mg, population";

/// 数据库行 (存栏数量尚未校验)
struct SnapshotRow {
    unit_id: String,
    cycle_id: Option<String>,
    measured_on: NaiveDate,
    animals_per_kg: Option<f64>,
    weight_mg: Option<f64>,
    population: Option<i64>,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            unit_id: row.get(0)?,
            cycle_id: row.get(1)?,
            measured_on: row.get(2)?,
            animals_per_kg: row.get(3)?,
            weight_mg: row.get(4)?,
            population: row.get(5)?,
        })
    }

    fn into_snapshot(self) -> RepositoryResult<BiometricSnapshot> {
        let population = match self.population {
            Some(p) => Some(u64::try_from(p).map_err(|_| RepositoryError::FieldValueError {
                field: "population".to_string(),
                message: format!("unit_id={} 存栏数量为负: {}", self.unit_id, p),
            })?),
            None => None,
        };

        Ok(BiometricSnapshot {
            unit_id: self.unit_id,
            cycle_id: self.cycle_id,
            measured_on: self.measured_on,
            animals_per_kg: self.animals_per_kg,
            weight_mg: self.weight_mg,
            population,
        })
    }
}

// ==========================================
// BiometricRepository - 测量快照仓储
// ==========================================
/// 职责: 读取 biometric_snapshot 表
pub struct BiometricRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BiometricRepository {
    /// 创建新的 BiometricRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询单元在进行中生产周期内的最近一次测量
    ///
    /// 已结束周期 (cycle_active = 0) 的测量不参与预测
    ///
    /// # 参数
    /// - `unit_id`: 育苗单元 ID
    ///
    /// # 返回
    /// - Ok(Some(BiometricSnapshot)): 最近一次测量 (同日多条取最后录入)
    /// - Ok(None): 该单元无进行中周期的测量记录
    /// - Err: 数据库错误
    pub fn find_latest_by_unit(&self, unit_id: &str) -> RepositoryResult<Option<BiometricSnapshot>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {SNAPSHOT_COLUMNS}
            FROM biometric_snapshot
            WHERE unit_id = ?1 AND cycle_active = 1
            ORDER BY measured_on DESC, snapshot_id DESC
            LIMIT 1
            "#
        );

        let row = conn
            .query_row(&sql, params![unit_id], SnapshotRow::from_row)
            .optional()?;

        row.map(SnapshotRow::into_snapshot).transpose()
    }

    /// 查询所有进行中生产周期的单元最近一次测量
    ///
    /// # 返回
    /// - 每个单元一条,按 unit_id 排序
    pub fn find_latest_active(&self) -> RepositoryResult<Vec<BiometricSnapshot>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {SNAPSHOT_COLUMNS}
            FROM biometric_snapshot b
            WHERE b.cycle_active = 1
              AND b.snapshot_id = (
                  SELECT s.snapshot_id
                  FROM biometric_snapshot s
                  WHERE s.unit_id = b.unit_id AND s.cycle_active = 1
                  ORDER BY s.measured_on DESC, s.snapshot_id DESC
                  LIMIT 1
              )
            ORDER BY b.unit_id
            "#
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], SnapshotRow::from_row)?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?.into_snapshot()?);
        }

        tracing::debug!(count = snapshots.len(), "读取进行中单元的最近测量");
        Ok(snapshots)
    }
}
