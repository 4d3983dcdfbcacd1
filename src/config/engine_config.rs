// ==========================================
// FLUPSY 育苗生长预测系统 - 引擎配置
// ==========================================
// 职责: 所有回退常量与上限的唯一来源,显式传入引擎
// 红线: 引擎内不得出现内联的默认费率字面量
// ==========================================

use crate::domain::types::{GrowthRateUnit, MortalityPeriod, ScenarioVariation};
use serde::{Deserialize, Serialize};

/// 生长率表为空时使用的默认日增长率 (2%/天)
pub const DEFAULT_DAILY_GROWTH_RATE: f64 = 0.02;

/// 死亡率表为空时使用的默认周期死亡率 (%)
pub const DEFAULT_MORTALITY_PCT: f64 = 1.0;

/// 单单元求解的默认上限天数
pub const DEFAULT_HORIZON_CAP_DAYS: u32 = 365;

/// 任何模拟循环允许的最大天数
pub const DEFAULT_MAX_HORIZON_DAYS: u32 = 1095;

/// 时间表允许的最大月数
pub const DEFAULT_MAX_TIMELINE_MONTHS: u32 = 24;

// ==========================================
// EngineConfig - 引擎配置对象
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // ===== 回退常量 =====
    pub default_daily_growth_rate: f64,
    pub default_mortality_pct: f64,

    // ===== 上限 =====
    pub horizon_cap_days: u32,
    pub max_horizon_days: u32,
    pub max_timeline_months: u32,

    // ===== 费率语义 =====
    pub growth_rate_unit: GrowthRateUnit,
    pub mortality_period: MortalityPeriod,

    // ===== 情景 =====
    pub default_variation: ScenarioVariation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_daily_growth_rate: DEFAULT_DAILY_GROWTH_RATE,
            default_mortality_pct: DEFAULT_MORTALITY_PCT,
            horizon_cap_days: DEFAULT_HORIZON_CAP_DAYS,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
            max_timeline_months: DEFAULT_MAX_TIMELINE_MONTHS,
            growth_rate_unit: GrowthRateUnit::DailyFraction,
            mortality_period: MortalityPeriod::Monthly,
            default_variation: ScenarioVariation::default(),
        }
    }
}

impl EngineConfig {
    /// 校验配置自洽性
    ///
    /// # 返回
    /// - Ok(()): 配置可用
    /// - Err(String): 不可用原因
    pub fn validate(&self) -> Result<(), String> {
        if !self.default_daily_growth_rate.is_finite() || self.default_daily_growth_rate < 0.0 {
            return Err(format!(
                "默认日增长率无效: {}",
                self.default_daily_growth_rate
            ));
        }
        if !self.default_mortality_pct.is_finite() || self.default_mortality_pct < 0.0 {
            return Err(format!("默认死亡率无效: {}", self.default_mortality_pct));
        }
        if self.horizon_cap_days > self.max_horizon_days {
            return Err(format!(
                "horizon_cap_days({}) 不能大于 max_horizon_days({})",
                self.horizon_cap_days, self.max_horizon_days
            ));
        }
        if self.max_timeline_months == 0 {
            return Err("max_timeline_months 必须大于 0".to_string());
        }
        if !self.default_variation.is_valid() {
            return Err("默认情景浮动百分比必须为非负有限值".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_cap_days, 365);
    }

    #[test]
    fn test_cap_above_max_is_rejected() {
        let config = EngineConfig {
            horizon_cap_days: 2000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
