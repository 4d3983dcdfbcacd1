// ==========================================
// FLUPSY 育苗生长预测系统 - 费率表
// ==========================================
// 职责: 生长率表 (按月) 与死亡率表 (按月 + 规格)
// 约束: 只读配置快照,由外部管理工具编辑,引擎不修改
// 约束: 生长率在引擎内部统一为"日增长率 (小数)"
// ==========================================

use crate::domain::types::{GrowthRateUnit, Month, MortalityPeriod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 月度百分比折算日增长率时使用的天数
pub const DAYS_PER_RATE_MONTH: f64 = 30.0;

/// 费率表构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateTableError {
    #[error("费率不能为负数: month={month}, value={value}")]
    NegativeRate { month: Month, value: f64 },

    #[error("费率不是有限数值: month={month}")]
    NonFiniteRate { month: Month },

    #[error("月度增长率低于 -100%: month={month}, value={value}")]
    InvalidMonthlyPercent { month: Month, value: f64 },
}

fn check_rate(month: Month, value: f64) -> Result<f64, RateTableError> {
    if !value.is_finite() {
        return Err(RateTableError::NonFiniteRate { month });
    }
    if value < 0.0 {
        return Err(RateTableError::NegativeRate { month, value });
    }
    Ok(value)
}

fn mean<'a>(values: impl Iterator<Item = &'a f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

// ==========================================
// GrowthRateTable - 生长率表
// ==========================================
// 序列化为条目列表;反序列化经 from_daily 校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GrowthRateEntry>", into = "Vec<GrowthRateEntry>")]
pub struct GrowthRateTable {
    rates: BTreeMap<Month, f64>, // 月份 → 日增长率
}

impl GrowthRateTable {
    /// 空表 (预测时回退到默认常量)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 由日增长率 (小数) 构造
    pub fn from_daily<I>(rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (Month, f64)>,
    {
        let mut table = BTreeMap::new();
        for (month, rate) in rates {
            table.insert(month, check_rate(month, rate)?);
        }
        Ok(Self { rates: table })
    }

    /// 由月度百分比构造,一次性换算为日增长率
    ///
    /// daily = (1 + p/100)^(1/30) - 1
    pub fn from_monthly_percent<I>(rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (Month, f64)>,
    {
        let mut daily = Vec::new();
        for (month, pct) in rates {
            if !pct.is_finite() {
                return Err(RateTableError::NonFiniteRate { month });
            }
            let factor = 1.0 + pct / 100.0;
            if factor <= 0.0 {
                return Err(RateTableError::InvalidMonthlyPercent { month, value: pct });
            }
            daily.push((month, factor.powf(1.0 / DAYS_PER_RATE_MONTH) - 1.0));
        }
        Self::from_daily(daily)
    }

    /// 按存储单位构造
    pub fn from_unit<I>(unit: GrowthRateUnit, rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (Month, f64)>,
    {
        match unit {
            GrowthRateUnit::DailyFraction => Self::from_daily(rates),
            GrowthRateUnit::MonthlyPercent => Self::from_monthly_percent(rates),
        }
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.rates.get(&month).copied()
    }

    /// 全部已配置费率的算术平均值
    pub fn mean(&self) -> Option<f64> {
        mean(self.rates.values())
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.rates.iter().map(|(m, r)| (*m, *r))
    }
}

/// 生长率表条目 (序列化形式)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateEntry {
    pub month: Month,
    pub daily_rate: f64,
}

impl TryFrom<Vec<GrowthRateEntry>> for GrowthRateTable {
    type Error = RateTableError;

    fn try_from(entries: Vec<GrowthRateEntry>) -> Result<Self, Self::Error> {
        Self::from_daily(entries.into_iter().map(|e| (e.month, e.daily_rate)))
    }
}

impl From<GrowthRateTable> for Vec<GrowthRateEntry> {
    fn from(table: GrowthRateTable) -> Self {
        table
            .iter()
            .map(|(month, daily_rate)| GrowthRateEntry { month, daily_rate })
            .collect()
    }
}

// ==========================================
// MortalityRateTable - 死亡率表
// ==========================================
// 键: (月份, 规格代码), 值: 周期死亡率 (%)
// 元组键无法作为 JSON 对象键,序列化时展开为条目列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MortalityRateTableData", into = "MortalityRateTableData")]
pub struct MortalityRateTable {
    period: MortalityPeriod,
    rates: BTreeMap<(Month, String), f64>,
}

impl MortalityRateTable {
    pub fn empty(period: MortalityPeriod) -> Self {
        Self {
            period,
            rates: BTreeMap::new(),
        }
    }

    pub fn new<I, S>(period: MortalityPeriod, rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (Month, S, f64)>,
        S: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (month, size_code, pct) in rates {
            table.insert((month, size_code.into()), check_rate(month, pct)?);
        }
        Ok(Self {
            period,
            rates: table,
        })
    }

    pub fn period(&self) -> MortalityPeriod {
        self.period
    }

    pub fn get(&self, month: Month, size_code: &str) -> Option<f64> {
        self.rates.get(&(month, size_code.to_string())).copied()
    }

    pub fn mean(&self) -> Option<f64> {
        mean(self.rates.values())
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

/// 死亡率表条目 (序列化形式)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityRateEntry {
    pub month: Month,
    pub size_code: String,
    pub rate_pct: f64,
}

#[derive(Serialize, Deserialize)]
struct MortalityRateTableData {
    period: MortalityPeriod,
    entries: Vec<MortalityRateEntry>,
}

impl TryFrom<MortalityRateTableData> for MortalityRateTable {
    type Error = RateTableError;

    fn try_from(data: MortalityRateTableData) -> Result<Self, Self::Error> {
        Self::new(
            data.period,
            data.entries
                .into_iter()
                .map(|e| (e.month, e.size_code, e.rate_pct)),
        )
    }
}

impl From<MortalityRateTable> for MortalityRateTableData {
    fn from(table: MortalityRateTable) -> Self {
        let entries = table
            .rates
            .into_iter()
            .map(|((month, size_code), rate_pct)| MortalityRateEntry {
                month,
                size_code,
                rate_pct,
            })
            .collect();
        Self {
            period: table.period,
            entries,
        }
    }
}
