// ==========================================
// FLUPSY 育苗生长预测系统 - 预测请求与结果
// ==========================================
// 约束: 结果按需计算,不落库
// 约束: 领域结果用值表达 (数据不足 / 未分类 / 不可达),不抛错
// ==========================================

use crate::domain::biometric::BiometricSnapshot;
use crate::domain::size_band::SizeClass;
use crate::domain::types::{Scenario, ScenarioVariation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 请求
// ==========================================

/// 前向预测请求 (固定天数)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub snapshot: BiometricSnapshot,
    pub horizon_days: u32,
    pub variation: ScenarioVariation,
}

/// 目标规格求解请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRequest {
    pub snapshot: BiometricSnapshot,
    pub target_code: String,
    pub horizon_cap_days: u32,
}

// ==========================================
// 前向预测结果
// ==========================================

/// 单一情景的预测值 (已取整)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: Scenario,
    pub weight_mg: f64,      // 四舍五入到整数毫克
    pub animals_per_kg: f64, // round(1,000,000 / 未取整重量)
    pub size: SizeClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub unit_id: String,
    pub measured_on: NaiveDate,
    pub horizon_days: u32,
    pub projected_on: NaiveDate,
    pub current_weight_mg: f64,
    pub current_animals_per_kg: f64,
    pub current_size: SizeClass,
    pub scenarios: Vec<ScenarioProjection>,
    pub used_fallback_rate: bool, // 使用了回退费率 (非致命)
}

impl ProjectionResult {
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioProjection> {
        self.scenarios.iter().find(|p| p.scenario == scenario)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionOutcome {
    Projected(ProjectionResult),
    InsufficientData { unit_id: String },
}

impl ProjectionOutcome {
    pub fn result(&self) -> Option<&ProjectionResult> {
        match self {
            ProjectionOutcome::Projected(r) => Some(r),
            ProjectionOutcome::InsufficientData { .. } => None,
        }
    }
}

// ==========================================
// 目标规格求解结果
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReachOutcome {
    /// 第 days 天日末重量首次 >= 阈值
    Reached {
        days: u32,
        reach_date: NaiveDate,
        weight_mg: f64,
    },
    /// 上限天数内未达到 (合法的领域结果)
    Unreachable { horizon_cap_days: u32 },
    InsufficientData,
}

impl ReachOutcome {
    pub fn days(&self) -> Option<u32> {
        match self {
            ReachOutcome::Reached { days, .. } => Some(*days),
            _ => None,
        }
    }

    pub fn reach_date(&self) -> Option<NaiveDate> {
        match self {
            ReachOutcome::Reached { reach_date, .. } => Some(*reach_date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProjection {
    pub unit_id: String,
    pub target_code: String,
    pub threshold_weight_mg: f64,
    pub outcome: ReachOutcome,
    pub used_fallback_rate: bool,
}
