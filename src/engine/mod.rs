// ==========================================
// FLUPSY 育苗生长预测系统 - 引擎层
// ==========================================
// 职责: 生长/规格/存活的纯计算,不拼 SQL,不做 I/O
// 约束: 所有配置以快照形式传入 (ProjectionContext)
// ==========================================

pub mod context;
pub mod error;
pub mod forward_projector;
pub mod growth_rate;
pub mod inverse_solver;
pub mod mortality;
pub mod size_classifier;
pub mod timeline;

// 重导出核心引擎
pub use context::ProjectionContext;
pub use error::ProjectionError;
pub use forward_projector::{DayStep, ForwardProjector, RawProjection};
pub use growth_rate::{GrowthRateProvider, ResolvedRate};
pub use inverse_solver::InverseSolver;
pub use mortality::{MortalityProjector, SurvivalResult};
pub use size_classifier::SizeClassifier;
pub use timeline::TimelineAggregator;
