// ==========================================
// FLUPSY 育苗生长预测系统 - 前向生长预测
// ==========================================
// 职责: 从测量日逐日复利模拟到 测量日 + horizon_days
// 输入: 测量快照 + 生长率表 + 情景浮动
// 输出: 理论 / 最佳 / 最差 三种情景的重量与规格
// ==========================================
// 规则: 第 k 天 (1..=horizon) 对应日期 measured_on + k,使用该日期所在月份的费率
// 规则: 循环内保持 f64 全精度,只在输出时取整
// ==========================================

use crate::config::EngineConfig;
use crate::domain::biometric::{animals_per_kg_from_weight, BiometricSnapshot};
use crate::domain::projection::{ProjectionOutcome, ProjectionResult, ScenarioProjection};
use crate::domain::rate_table::GrowthRateTable;
use crate::domain::types::{Scenario, ScenarioVariation};
use crate::engine::error::ProjectionError;
use crate::engine::growth_rate::GrowthRateProvider;
use crate::engine::size_classifier::SizeClassifier;
use chrono::NaiveDate;
use tracing::instrument;

/// 未取整的模拟结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawProjection {
    pub weight_mg: f64,
    pub used_fallback: bool,
}

/// 单日模拟结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStep {
    pub weight_mg: f64,
    pub used_fallback: bool,
}

/// 输出取整: 重量取整到毫克,每公斤只数由未取整重量推导
pub(crate) fn round_projection(weight_mg: f64) -> (f64, f64) {
    (weight_mg.round(), animals_per_kg_from_weight(weight_mg).round())
}

// ==========================================
// ForwardProjector - 前向预测器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ForwardProjector<'a> {
    rates: GrowthRateProvider<'a>,
    classifier: &'a SizeClassifier,
    variation: ScenarioVariation,
    max_horizon_days: u32,
}

impl<'a> ForwardProjector<'a> {
    pub fn new(
        growth_table: &'a GrowthRateTable,
        classifier: &'a SizeClassifier,
        config: &EngineConfig,
        variation: ScenarioVariation,
    ) -> Self {
        Self {
            rates: GrowthRateProvider::new(growth_table, config),
            classifier,
            variation,
            max_horizon_days: config.max_horizon_days,
        }
    }

    pub fn classifier(&self) -> &'a SizeClassifier {
        self.classifier
    }

    /// 校验预测天数
    pub fn check_horizon(&self, horizon_days: u32) -> Result<(), ProjectionError> {
        if horizon_days > self.max_horizon_days {
            return Err(ProjectionError::HorizonTooLarge {
                horizon_days,
                max: self.max_horizon_days,
            });
        }
        Ok(())
    }

    // ==========================================
    // 单日复利 (前向预测与目标求解共用)
    // ==========================================

    /// 以 date 当天的费率 (经情景调整) 对重量复利一天
    pub fn step(&self, weight_mg: f64, date: NaiveDate, scenario: Scenario) -> DayStep {
        let resolved = self.rates.rate_for_date(date);
        let rate = self.variation.adjust(resolved.daily_rate, scenario);
        DayStep {
            weight_mg: weight_mg * (1.0 + rate),
            used_fallback: resolved.source.is_fallback(),
        }
    }

    /// 从 measured_on 起模拟 horizon_days 天 (不取整)
    ///
    /// horizon_days = 0 时原样返回 weight_mg
    pub fn project_weight(
        &self,
        weight_mg: f64,
        measured_on: NaiveDate,
        horizon_days: u32,
        scenario: Scenario,
    ) -> RawProjection {
        let mut weight = weight_mg;
        let mut used_fallback = false;

        for date in measured_on.iter_days().skip(1).take(horizon_days as usize) {
            let day = self.step(weight, date, scenario);
            weight = day.weight_mg;
            used_fallback |= day.used_fallback;
        }

        RawProjection {
            weight_mg: weight,
            used_fallback,
        }
    }

    // ==========================================
    // 对外入口
    // ==========================================

    /// 单一情景预测
    #[instrument(skip(self, snapshot, scenario), fields(unit_id = %snapshot.unit_id, scenario = %scenario))]
    pub fn project(
        &self,
        snapshot: &BiometricSnapshot,
        horizon_days: u32,
        scenario: Scenario,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        self.project_scenarios(snapshot, horizon_days, &[scenario])
    }

    /// 理论 / 最佳 / 最差 三情景预测
    #[instrument(skip(self, snapshot), fields(unit_id = %snapshot.unit_id))]
    pub fn project_all(
        &self,
        snapshot: &BiometricSnapshot,
        horizon_days: u32,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        self.project_scenarios(snapshot, horizon_days, &Scenario::ALL)
    }

    fn project_scenarios(
        &self,
        snapshot: &BiometricSnapshot,
        horizon_days: u32,
        scenarios: &[Scenario],
    ) -> Result<ProjectionOutcome, ProjectionError> {
        self.check_horizon(horizon_days)?;

        let (current_weight, current_apk) =
            match (snapshot.current_weight_mg(), snapshot.usable_animals_per_kg()) {
                (Some(w), Some(apk)) => (w, apk),
                _ => {
                    tracing::debug!(unit_id = %snapshot.unit_id, "缺少每公斤只数，无法预测");
                    return Ok(ProjectionOutcome::InsufficientData {
                        unit_id: snapshot.unit_id.clone(),
                    });
                }
            };

        let mut used_fallback_rate = false;
        let projections = scenarios
            .iter()
            .map(|&scenario| {
                let raw = self.project_weight(current_weight, snapshot.measured_on, horizon_days, scenario);
                used_fallback_rate |= raw.used_fallback;
                let (weight_mg, animals_per_kg) = round_projection(raw.weight_mg);
                ScenarioProjection {
                    scenario,
                    weight_mg,
                    animals_per_kg,
                    size: self.classifier.classify(animals_per_kg),
                }
            })
            .collect();

        if used_fallback_rate {
            tracing::warn!(unit_id = %snapshot.unit_id, "生长率表缺失月份或为空，已使用回退费率");
        }

        let (current_weight_mg, _) = round_projection(current_weight);
        let projected_on = snapshot
            .measured_on
            .checked_add_days(chrono::Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);

        Ok(ProjectionOutcome::Projected(ProjectionResult {
            unit_id: snapshot.unit_id.clone(),
            measured_on: snapshot.measured_on,
            horizon_days,
            projected_on,
            current_weight_mg,
            current_animals_per_kg: current_apk,
            current_size: self.classifier.classify(current_apk),
            scenarios: projections,
            used_fallback_rate,
        }))
    }
}
