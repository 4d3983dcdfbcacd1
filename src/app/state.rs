// ==========================================
// FLUPSY 育苗生长预测系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use crate::api::{ApiResult, ProjectionApi, ProjectionDataSource, TimelineApi};
use std::path::PathBuf;
use std::sync::Arc;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "FLUPSY_GROWTH_DB_PATH";

const DB_FILE_NAME: &str = "flupsy_growth.db";

/// 应用状态
///
/// 所有 API 共享同一个数据源 (同一 SQLite 连接)
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 单元预测API
    pub projection_api: Arc<ProjectionApi>,

    /// 可售时间表API
    pub timeline_api: Arc<TimelineApi>,
}

impl AppState {
    /// 打开数据库并创建全部 API 实例
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化应用状态");
        let source = Arc::new(ProjectionDataSource::open(&db_path)?);

        Ok(Self {
            db_path,
            projection_api: Arc::new(ProjectionApi::new(source.clone())),
            timeline_api: Arc::new(TimelineApi::new(source)),
        })
    }
}

// ==========================================
// 数据库路径
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 FLUPSY_GROWTH_DB_PATH (非空时)
/// - 否则: 用户数据目录/flupsy-growth/flupsy_growth.db
/// - 无法获取用户数据目录时: ./flupsy_growth.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("flupsy-growth");
        // 目录创建失败时仍返回该路径,由打开数据库时报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join(DB_FILE_NAME);
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // AppState::new() 需要真实的数据库文件,见 tests/projection_api_test.rs
}
