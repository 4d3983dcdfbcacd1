// ==========================================
// FLUPSY 育苗生长预测系统 - API 层
// ==========================================
// 职责: 加载数据快照、校验请求、调用引擎;与传输方式无关
// ==========================================

pub mod data_source;
pub mod error;
pub mod projection_api;
pub mod timeline_api;

// 重导出核心类型
pub use data_source::ProjectionDataSource;
pub use error::{ApiError, ApiResult};
pub use projection_api::ProjectionApi;
pub use timeline_api::{TimelineApi, TimelineResponse};
