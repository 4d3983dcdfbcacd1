// ==========================================
// FLUPSY 育苗生长预测系统 - 可售时间表 API
// ==========================================
// 职责: 对全部进行中单元生成按目标规格、按月的可售时间表
// ==========================================

use crate::api::data_source::ProjectionDataSource;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::timeline::Timeline;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// 时间表报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    /// 报表ID (每次生成唯一)
    pub report_id: String,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
    /// 参与计算的单元数 (含数据不足的单元)
    pub unit_count: usize,
    /// 本次使用的 global 配置 (未配置的键使用默认值,不在此列)
    pub config_snapshot: BTreeMap<String, String>,
    pub timeline: Timeline,
}

// ==========================================
// TimelineApi - 可售时间表 API
// ==========================================
pub struct TimelineApi {
    source: Arc<ProjectionDataSource>,
}

impl TimelineApi {
    pub fn new(source: Arc<ProjectionDataSource>) -> Self {
        Self { source }
    }

    /// 生成可售时间表
    ///
    /// # 参数
    /// - `target_codes`: 目标规格代码 (至少一个)
    /// - `horizon_months`: 覆盖月数 (1..=max_timeline_months)
    /// - `reference_date`: 时间表起点,None 时取本地今天
    ///
    /// # 返回
    /// - Ok(TimelineResponse)
    /// - Err(NotFound): 规格代码未知
    /// - Err(InvalidInput): 目标列表为空或月数越界
    #[instrument(skip(self, target_codes), fields(targets = target_codes.len()))]
    pub async fn build_timeline(
        &self,
        target_codes: &[String],
        horizon_months: i64,
        reference_date: Option<NaiveDate>,
    ) -> ApiResult<TimelineResponse> {
        if horizon_months <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "horizon_months必须为正数: {}",
                horizon_months
            )));
        }
        let horizon_months = u32::try_from(horizon_months).map_err(|_| {
            ApiError::InvalidInput(format!("horizon_months过大: {}", horizon_months))
        })?;
        let reference_date = reference_date.unwrap_or_else(|| Local::now().date_naive());

        let (context, config_snapshot) =
            futures::try_join!(self.source.load_context(), self.source.config_snapshot())?;
        let units = self.source.latest_active_snapshots()?;
        let timeline = context
            .timeline()
            .build(&units, target_codes, reference_date, horizon_months)?;

        let response = TimelineResponse {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            unit_count: units.len(),
            config_snapshot,
            timeline,
        };

        tracing::info!(
            report_id = %response.report_id,
            units = response.unit_count,
            %reference_date,
            horizon_months,
            "可售时间表生成完成"
        );
        Ok(response)
    }
}
