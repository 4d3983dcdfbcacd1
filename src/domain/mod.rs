// ==========================================
// FLUPSY 育苗生长预测系统 - 领域模型层
// ==========================================
// 职责: 定义测量快照、规格带、费率表、预测结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod biometric;
pub mod projection;
pub mod rate_table;
pub mod size_band;
pub mod timeline;
pub mod types;

// 重导出核心类型
pub use biometric::{animals_per_kg_from_weight, weight_from_animals_per_kg, BiometricSnapshot};
pub use projection::{
    ProjectionOutcome, ProjectionRequest, ProjectionResult, ReachOutcome, ScenarioProjection,
    TargetProjection, TargetRequest,
};
pub use rate_table::{
    GrowthRateEntry, GrowthRateTable, MortalityRateEntry, MortalityRateTable, RateTableError,
};
pub use size_band::{SizeBand, SizeClass};
pub use timeline::{MonthBucket, NotReachingTally, TargetSchedule, Timeline, TimelineEntry};
pub use types::{GrowthRateUnit, Month, MortalityPeriod, RateSource, Scenario, ScenarioVariation};
