// ==========================================
// FLUPSY 育苗生长预测系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把仓储/引擎错误转换为带状态码的错误
// 状态码: 404 资源不存在 / 422 请求参数无效 / 500 其他
// ==========================================

use crate::engine::error::ProjectionError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问 / 配置错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 422,
            ApiError::NotFound(_) => 404,
            ApiError::DatabaseError(_)
            | ApiError::ConfigError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => 500,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            // 库中数据不合法属于配置问题,而非请求问题
            RepositoryError::FieldValueError { field, message } => {
                ApiError::ConfigError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InvalidRateTable(e) => ApiError::ConfigError(e.to_string()),

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ProjectionError 转换
// ==========================================
impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::UnknownSizeBand(_) => ApiError::NotFound(err.to_string()),
            ProjectionError::HorizonTooLarge { .. }
            | ProjectionError::InvalidTimelineMonths { .. }
            | ProjectionError::EmptyTargetList
            | ProjectionError::InvalidVariation { .. } => ApiError::InvalidInput(err.to_string()),
            ProjectionError::InvalidRate(_) => ApiError::ConfigError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
