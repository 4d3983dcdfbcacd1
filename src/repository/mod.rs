// ==========================================
// FLUPSY 育苗生长预测系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供只读数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod biometric_repo;
pub mod error;
pub mod rate_table_repo;
pub mod size_band_repo;

// 重导出核心仓储
pub use biometric_repo::BiometricRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use rate_table_repo::RateTableRepository;
pub use size_band_repo::SizeBandRepository;
