// ==========================================
// FLUPSY 育苗生长预测系统 - 配置层
// ==========================================
// 职责: 引擎配置对象 + 配置读取
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod projection_config_trait;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::EngineConfig;
pub use projection_config_trait::ProjectionConfigReader;
