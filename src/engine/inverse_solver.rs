// ==========================================
// FLUPSY 育苗生长预测系统 - 目标规格求解
// ==========================================
// 职责: 求单元进入目标规格所需天数与日期
// 输入: 测量快照 + 目标规格带 + 上限天数
// 输出: Reached / Unreachable / InsufficientData
// ==========================================
// 规则: 阈值重量 = 1,000,000 / 目标规格 min_animals_per_kg
// 规则: 报告的天数是日末重量首次 >= 阈值的那一天,前一天必然 < 阈值
// 规则: 仅使用理论情景,复用 ForwardProjector::step
// ==========================================

use crate::domain::biometric::BiometricSnapshot;
use crate::domain::projection::{ReachOutcome, TargetProjection};
use crate::domain::size_band::SizeBand;
use crate::domain::types::Scenario;
use crate::engine::error::ProjectionError;
use crate::engine::forward_projector::{round_projection, ForwardProjector};
use crate::engine::size_classifier::SizeClassifier;
use tracing::instrument;

// ==========================================
// InverseSolver - 目标规格求解器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct InverseSolver<'a> {
    projector: ForwardProjector<'a>,
}

impl<'a> InverseSolver<'a> {
    pub fn new(projector: ForwardProjector<'a>) -> Self {
        Self { projector }
    }

    pub fn classifier(&self) -> &'a SizeClassifier {
        self.projector.classifier()
    }

    /// 按规格代码求解
    ///
    /// # 错误
    /// - UnknownSizeBand: 规格代码不存在
    /// - HorizonTooLarge: 上限天数超过配置允许的最大值
    #[instrument(skip(self, snapshot), fields(unit_id = %snapshot.unit_id))]
    pub fn days_to_reach_code(
        &self,
        snapshot: &BiometricSnapshot,
        target_code: &str,
        horizon_cap_days: u32,
    ) -> Result<TargetProjection, ProjectionError> {
        let band = self
            .projector
            .classifier()
            .find(target_code)
            .ok_or_else(|| ProjectionError::UnknownSizeBand(target_code.to_string()))?;
        self.days_to_reach(snapshot, band, horizon_cap_days)
    }

    /// 按规格带求解
    pub fn days_to_reach(
        &self,
        snapshot: &BiometricSnapshot,
        target: &SizeBand,
        horizon_cap_days: u32,
    ) -> Result<TargetProjection, ProjectionError> {
        self.projector.check_horizon(horizon_cap_days)?;
        Ok(self.solve(snapshot, target, horizon_cap_days))
    }

    /// 求解主体 (调用方已校验上限)
    pub(crate) fn solve(
        &self,
        snapshot: &BiometricSnapshot,
        target: &SizeBand,
        horizon_cap_days: u32,
    ) -> TargetProjection {
        let threshold = target.threshold_weight_mg();
        let mut used_fallback_rate = false;

        let outcome = match snapshot.current_weight_mg() {
            None => ReachOutcome::InsufficientData,
            Some(current) if current >= threshold => ReachOutcome::Reached {
                days: 0,
                reach_date: snapshot.measured_on,
                weight_mg: round_projection(current).0,
            },
            Some(current) => {
                let mut weight = current;
                let mut reached = None;

                let days = snapshot
                    .measured_on
                    .iter_days()
                    .skip(1)
                    .take(horizon_cap_days as usize);
                for (offset, date) in days.enumerate() {
                    let step = self.projector.step(weight, date, Scenario::Theoretical);
                    weight = step.weight_mg;
                    used_fallback_rate |= step.used_fallback;

                    if weight >= threshold {
                        reached = Some(ReachOutcome::Reached {
                            days: offset as u32 + 1,
                            reach_date: date,
                            weight_mg: round_projection(weight).0,
                        });
                        break;
                    }
                }

                reached.unwrap_or(ReachOutcome::Unreachable { horizon_cap_days })
            }
        };

        tracing::debug!(
            unit_id = %snapshot.unit_id,
            target = %target.code,
            threshold_mg = threshold,
            outcome = ?outcome,
            "目标规格求解完成"
        );

        TargetProjection {
            unit_id: snapshot.unit_id.clone(),
            target_code: target.code.clone(),
            threshold_weight_mg: threshold,
            outcome,
            used_fallback_rate,
        }
    }
}
