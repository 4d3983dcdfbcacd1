// ==========================================
// FLUPSY 育苗生长预测系统 - 规格带仓储
// ==========================================
// 红线: Repository 不含业务逻辑 (排序/重叠检查在 SizeClassifier)
// ==========================================

use crate::domain::size_band::SizeBand;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 职责: 读取 size_band 表
pub struct SizeBandRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SizeBandRepository {
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

    /// 查询全部规格带 (按 code 排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<SizeBand>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT code, name, min_animals_per_kg, max_animals_per_kg
            FROM size_band
            ORDER BY code
            "#,
        )?;

        let bands = stmt
            .query_map([], |row| {
                Ok(SizeBand {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    min_animals_per_kg: row.get(2)?,
                    max_animals_per_kg: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bands)
    }
}
