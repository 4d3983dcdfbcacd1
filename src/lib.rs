// ==========================================
// FLUPSY 育苗生长预测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 生长与规格预测 (只读计算,结果不落库)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预测计算
pub mod engine;

// 配置层 - 引擎配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/表结构）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GrowthRateUnit, Month, MortalityPeriod, Scenario, ScenarioVariation};

// 领域实体
pub use domain::{
    BiometricSnapshot, GrowthRateTable, MortalityRateTable, ProjectionOutcome, ReachOutcome,
    SizeBand, SizeClass, TargetProjection, Timeline,
};

// 引擎
pub use engine::{
    ForwardProjector, GrowthRateProvider, InverseSolver, MortalityProjector, ProjectionContext,
    ProjectionError, SizeClassifier, TimelineAggregator,
};

// 配置
pub use config::EngineConfig;

// API
pub use api::{ApiError, ProjectionApi, TimelineApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "FLUPSY 育苗生长预测系统";
