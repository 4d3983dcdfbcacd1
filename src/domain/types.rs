// ==========================================
// FLUPSY 育苗生长预测系统 - 领域类型定义
// ==========================================
// 职责: 月份索引、预测情景、费率单位等基础枚举
// 约束: 月份一律使用数字索引 (0-11),不依赖任何语言区域的月份名称
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 月份 (Month) - 0 基索引
// ==========================================
// 0 = 一月, 11 = 十二月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    /// 由 0 基索引构造 (0..=11)
    pub fn from_index0(index0: u32) -> Option<Self> {
        (index0 < 12).then_some(Self(index0))
    }

    /// 由 1 基月份数字构造 (1..=12),用于数据库/配置读取
    pub fn from_number(month: u32) -> Option<Self> {
        month.checked_sub(1).and_then(Self::from_index0)
    }

    /// 取日期所在月份
    pub fn of(date: NaiveDate) -> Self {
        Self(date.month0())
    }

    pub fn index0(self) -> u32 {
        self.0
    }

    /// 1 基月份数字
    pub fn number(self) -> u32 {
        self.0 + 1
    }

    /// 全部 12 个月
    pub fn all() -> impl Iterator<Item = Month> {
        (0..12).map(Month)
    }
}

impl TryFrom<u32> for Month {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Month::from_index0(value).ok_or_else(|| format!("月份索引越界: {}", value))
    }
}

impl From<Month> for u32 {
    fn from(m: Month) -> u32 {
        m.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.number())
    }
}

// ==========================================
// 预测情景 (Scenario)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    Theoretical, // 理论值 (不调整)
    Best,        // 最佳 rate*(1+v)
    Worst,       // 最差 rate*(1-v)
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Theoretical, Scenario::Best, Scenario::Worst];
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Theoretical => write!(f, "THEORETICAL"),
            Scenario::Best => write!(f, "BEST"),
            Scenario::Worst => write!(f, "WORST"),
        }
    }
}

// ==========================================
// 情景浮动百分比
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioVariation {
    pub best_pct: f64,  // 最佳情景上浮 (%)
    pub worst_pct: f64, // 最差情景下浮 (%)
}

impl ScenarioVariation {
    pub fn new(best_pct: f64, worst_pct: f64) -> Self {
        Self { best_pct, worst_pct }
    }

    /// 无浮动: 三个情景结果一致
    pub fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    /// 对日增长率应用情景调整
    ///
    /// 最差情景下限为 0,保证增长率非负
    pub fn adjust(&self, daily_rate: f64, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Theoretical => daily_rate,
            Scenario::Best => daily_rate * (1.0 + self.best_pct / 100.0),
            Scenario::Worst => (daily_rate * (1.0 - self.worst_pct / 100.0)).max(0.0),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.best_pct.is_finite()
            && self.worst_pct.is_finite()
            && self.best_pct >= 0.0
            && self.worst_pct >= 0.0
    }
}

impl Default for ScenarioVariation {
    fn default() -> Self {
        Self::new(20.0, 20.0)
    }
}

// ==========================================
// 生长率存储单位 (Growth Rate Unit)
// ==========================================
// 引擎内部统一使用"日增长率 (小数)";换算只在加载时做一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthRateUnit {
    DailyFraction,  // 0.01 = 1%/天
    MonthlyPercent, // 35.0 = 35%/月 (按 30 天复利折算)
}

impl fmt::Display for GrowthRateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthRateUnit::DailyFraction => write!(f, "DAILY_FRACTION"),
            GrowthRateUnit::MonthlyPercent => write!(f, "MONTHLY_PERCENT"),
        }
    }
}

impl std::str::FromStr for GrowthRateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAILY_FRACTION" => Ok(GrowthRateUnit::DailyFraction),
            "MONTHLY_PERCENT" => Ok(GrowthRateUnit::MonthlyPercent),
            other => Err(format!("未知的生长率单位: {}", other)),
        }
    }
}

// ==========================================
// 死亡率周期 (Mortality Period)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MortalityPeriod {
    Daily,   // 百分比为每日死亡率
    Monthly, // 百分比为每月死亡率,按当月天数折算为日存活率
}

impl fmt::Display for MortalityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MortalityPeriod::Daily => write!(f, "DAILY"),
            MortalityPeriod::Monthly => write!(f, "MONTHLY"),
        }
    }
}

impl std::str::FromStr for MortalityPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAILY" => Ok(MortalityPeriod::Daily),
            "MONTHLY" => Ok(MortalityPeriod::Monthly),
            other => Err(format!("未知的死亡率周期: {}", other)),
        }
    }
}

// ==========================================
// 费率来源 (Rate Source)
// ==========================================
// 回退不是错误,但结果需携带标记供调用方查看
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    Configured,      // 表中直接命中
    MonthMean,       // 缺失月份,取全部已配置费率均值
    DefaultConstant, // 表为空,取默认常量
}

impl RateSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, RateSource::Configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_from_date_is_zero_based() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let dec = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(Month::of(jan).index0(), 0);
        assert_eq!(Month::of(dec).index0(), 11);
        assert_eq!(Month::of(dec).number(), 12);
    }

    #[test]
    fn test_month_bounds() {
        assert!(Month::from_index0(12).is_none());
        assert!(Month::from_number(0).is_none());
        assert_eq!(Month::from_number(3), Month::from_index0(2));
        assert_eq!(Month::all().count(), 12);
    }

    #[test]
    fn test_variation_adjust() {
        let v = ScenarioVariation::new(10.0, 10.0);
        assert!((v.adjust(0.02, Scenario::Best) - 0.022).abs() < 1e-12);
        assert!((v.adjust(0.02, Scenario::Worst) - 0.018).abs() < 1e-12);
        assert_eq!(v.adjust(0.02, Scenario::Theoretical), 0.02);

        // 下浮超过 100% 时不允许出现负增长
        let extreme = ScenarioVariation::new(0.0, 150.0);
        assert_eq!(extreme.adjust(0.02, Scenario::Worst), 0.0);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("monthly".parse::<MortalityPeriod>(), Ok(MortalityPeriod::Monthly));
        assert_eq!(
            "DAILY_FRACTION".parse::<GrowthRateUnit>(),
            Ok(GrowthRateUnit::DailyFraction)
        );
        assert!("weekly".parse::<MortalityPeriod>().is_err());
    }
}
