// ==========================================
// FLUPSY 育苗生长预测系统 - 应用层
// ==========================================
// 职责: 组装共享状态 (数据库路径 + API 实例),供命令行/服务入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
