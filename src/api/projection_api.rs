// ==========================================
// FLUPSY 育苗生长预测系统 - 单元预测 API
// ==========================================
// 职责: 单元前向预测 (固定天数) 与目标规格求解
// 状态码: 单元/规格不存在 → 404, 参数越界 → 422
// ==========================================

use crate::api::data_source::ProjectionDataSource;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::projection::{
    ProjectionOutcome, ProjectionRequest, TargetProjection, TargetRequest,
};
use crate::domain::types::ScenarioVariation;
use std::sync::Arc;
use tracing::instrument;

/// 请求中的天数 (i64) → 引擎天数 (u32)
fn parse_days(field: &str, days: i64) -> ApiResult<u32> {
    if days < 0 {
        return Err(ApiError::InvalidInput(format!("{}不能为负数: {}", field, days)));
    }
    u32::try_from(days).map_err(|_| ApiError::InvalidInput(format!("{}过大: {}", field, days)))
}

fn require_unit_id(unit_id: &str) -> ApiResult<()> {
    if unit_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("单元ID不能为空".to_string()));
    }
    Ok(())
}

// ==========================================
// ProjectionApi - 单元预测 API
// ==========================================
pub struct ProjectionApi {
    source: Arc<ProjectionDataSource>,
}

impl ProjectionApi {
    pub fn new(source: Arc<ProjectionDataSource>) -> Self {
        Self { source }
    }

    /// 预测单元 horizon_days 天后的重量与规格 (三情景)
    ///
    /// # 参数
    /// - `unit_id`: 育苗单元 ID
    /// - `horizon_days`: 预测天数 (0..=max_horizon_days)
    /// - `variation`: 情景浮动,None 时使用配置默认值
    ///
    /// # 返回
    /// - Ok(ProjectionOutcome::Projected): 预测结果
    /// - Ok(ProjectionOutcome::InsufficientData): 最近测量缺少每公斤只数
    /// - Err(NotFound): 单元无测量记录
    /// - Err(InvalidInput): 天数为负或超出上限,浮动百分比无效
    #[instrument(skip(self, variation))]
    pub async fn project_horizon(
        &self,
        unit_id: &str,
        horizon_days: i64,
        variation: Option<ScenarioVariation>,
    ) -> ApiResult<ProjectionOutcome> {
        require_unit_id(unit_id)?;
        let horizon_days = parse_days("horizon_days", horizon_days)?;

        let context = self.source.load_context().await?;
        let request = ProjectionRequest {
            snapshot: self.source.latest_snapshot(unit_id)?,
            horizon_days,
            variation: variation.unwrap_or(context.config().default_variation),
        };
        let outcome = context.run_projection(&request)?;

        tracing::info!(
            unit_id,
            horizon_days,
            projected = outcome.result().is_some(),
            "单元前向预测完成"
        );
        Ok(outcome)
    }

    /// 求单元进入目标规格所需天数
    ///
    /// # 参数
    /// - `unit_id`: 育苗单元 ID
    /// - `target_code`: 目标规格代码
    /// - `horizon_cap`: 求解上限天数,None 时使用配置 horizon_cap_days
    ///
    /// # 返回
    /// - Ok(TargetProjection): Reached / Unreachable / InsufficientData
    /// - Err(NotFound): 单元无测量记录或规格代码未知
    /// - Err(InvalidInput): 上限为负或超出 max_horizon_days
    #[instrument(skip(self))]
    pub async fn project_target(
        &self,
        unit_id: &str,
        target_code: &str,
        horizon_cap: Option<i64>,
    ) -> ApiResult<TargetProjection> {
        require_unit_id(unit_id)?;
        if target_code.trim().is_empty() {
            return Err(ApiError::InvalidInput("目标规格代码不能为空".to_string()));
        }
        let horizon_cap = horizon_cap
            .map(|cap| parse_days("horizon_cap", cap))
            .transpose()?;

        let context = self.source.load_context().await?;
        let request = TargetRequest {
            snapshot: self.source.latest_snapshot(unit_id)?,
            target_code: target_code.to_string(),
            horizon_cap_days: horizon_cap.unwrap_or(context.config().horizon_cap_days),
        };
        let projection = context.run_target(&request)?;

        tracing::info!(
            unit_id,
            target_code,
            days = ?projection.outcome.days(),
            "目标规格求解完成"
        );
        Ok(projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("horizon_days", 0).unwrap(), 0);
        assert_eq!(parse_days("horizon_days", 30).unwrap(), 30);
        assert_eq!(parse_days("horizon_days", -1).unwrap_err().status_code(), 422);
        assert!(matches!(
            parse_days("horizon_days", i64::MAX),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_require_unit_id() {
        assert!(require_unit_id("B-01").is_ok());
        assert!(matches!(require_unit_id("  "), Err(ApiError::InvalidInput(_))));
    }
}
