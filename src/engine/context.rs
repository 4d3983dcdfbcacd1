// ==========================================
// FLUPSY 育苗生长预测系统 - 预测上下文
// ==========================================
// 职责: 持有一次调用所需的全部只读配置快照,派生各引擎
// 约束: 快照在进入模拟循环前一次性加载,循环内无 I/O
// ==========================================

use crate::config::EngineConfig;
use crate::domain::projection::{ProjectionOutcome, ProjectionRequest, TargetProjection, TargetRequest};
use crate::domain::rate_table::{GrowthRateTable, MortalityRateTable};
use crate::domain::size_band::SizeBand;
use crate::domain::types::ScenarioVariation;
use crate::engine::error::ProjectionError;
use crate::engine::forward_projector::ForwardProjector;
use crate::engine::inverse_solver::InverseSolver;
use crate::engine::mortality::MortalityProjector;
use crate::engine::size_classifier::SizeClassifier;
use crate::engine::timeline::TimelineAggregator;

// ==========================================
// ProjectionContext - 预测上下文
// ==========================================
#[derive(Debug, Clone)]
pub struct ProjectionContext {
    classifier: SizeClassifier,
    growth: GrowthRateTable,
    mortality: MortalityRateTable,
    config: EngineConfig,
}

impl ProjectionContext {
    pub fn new(
        size_bands: &[SizeBand],
        growth: GrowthRateTable,
        mortality: MortalityRateTable,
        config: EngineConfig,
    ) -> Self {
        Self {
            classifier: SizeClassifier::new(size_bands),
            growth,
            mortality,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SizeClassifier {
        &self.classifier
    }

    /// 前向预测器 (指定情景浮动)
    pub fn projector(&self, variation: ScenarioVariation) -> ForwardProjector<'_> {
        ForwardProjector::new(&self.growth, &self.classifier, &self.config, variation)
    }

    /// 目标规格求解器 (仅理论情景)
    pub fn solver(&self) -> InverseSolver<'_> {
        InverseSolver::new(self.projector(ScenarioVariation::none()))
    }

    pub fn mortality(&self) -> MortalityProjector<'_> {
        MortalityProjector::new(&self.mortality, &self.config)
    }

    pub fn timeline(&self) -> TimelineAggregator<'_> {
        TimelineAggregator::new(self.solver(), self.mortality(), &self.config)
    }

    // ==========================================
    // 请求入口
    // ==========================================

    /// 执行前向预测请求 (理论 / 最佳 / 最差)
    ///
    /// # 错误
    /// - InvalidVariation: 浮动百分比为负或非有限值
    /// - HorizonTooLarge: 天数超过 max_horizon_days
    pub fn run_projection(
        &self,
        request: &ProjectionRequest,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        let variation = request.variation;
        if !variation.is_valid() {
            return Err(ProjectionError::InvalidVariation {
                best_pct: variation.best_pct,
                worst_pct: variation.worst_pct,
            });
        }
        self.projector(variation)
            .project_all(&request.snapshot, request.horizon_days)
    }

    /// 执行目标规格求解请求
    ///
    /// # 错误
    /// - UnknownSizeBand: 规格代码不存在
    /// - HorizonTooLarge: 上限天数超过 max_horizon_days
    pub fn run_target(&self, request: &TargetRequest) -> Result<TargetProjection, ProjectionError> {
        self.solver().days_to_reach_code(
            &request.snapshot,
            &request.target_code,
            request.horizon_cap_days,
        )
    }
}
