// ==========================================
// FLUPSY 育苗生长预测系统 - 存活数量预测
// ==========================================
// 职责: 按月份 + 规格的死亡率,对存栏数量做逐日衰减
// 输入: 初始数量 + 起始日期 + 天数 + 规格代码
// 输出: 存活数量 (>= 0)
// ==========================================
// 周期语义由死亡率表显式声明:
// - DAILY:   日存活率 = 1 - p/100
// - MONTHLY: 日存活率 = (1 - p/100)^(1/当月天数)
// ==========================================

use crate::config::EngineConfig;
use crate::domain::rate_table::MortalityRateTable;
use crate::domain::types::{Month, MortalityPeriod, RateSource};
use chrono::{Datelike, NaiveDate};
use tracing::instrument;

/// 存活预测结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalResult {
    pub surviving: u64,
    pub survival_fraction: f64,
    pub used_fallback: bool,
}

/// 日期所在月份的天数
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    match (
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        _ => 30,
    }
}

// ==========================================
// MortalityProjector - 存活数量预测器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct MortalityProjector<'a> {
    table: &'a MortalityRateTable,
    fallback_pct: f64,
    fallback_source: RateSource,
}

impl<'a> MortalityProjector<'a> {
    pub fn new(table: &'a MortalityRateTable, config: &EngineConfig) -> Self {
        let (fallback_pct, fallback_source) = match table.mean() {
            Some(mean) => (mean, RateSource::MonthMean),
            None => (config.default_mortality_pct, RateSource::DefaultConstant),
        };
        Self {
            table,
            fallback_pct,
            fallback_source,
        }
    }

    /// 解析周期死亡率 (%)
    ///
    /// size_code 为 None (未分类单元) 时直接使用回退值
    pub fn rate_for(&self, month: Month, size_code: Option<&str>) -> (f64, RateSource) {
        size_code
            .and_then(|code| self.table.get(month, code))
            .map(|pct| (pct, RateSource::Configured))
            .unwrap_or((self.fallback_pct, self.fallback_source))
    }

    /// date 当天的存活率 (0..=1)
    pub fn daily_survival(&self, date: NaiveDate, size_code: Option<&str>) -> (f64, RateSource) {
        let (pct, source) = self.rate_for(Month::of(date), size_code);
        let period_survival = (1.0 - pct / 100.0).clamp(0.0, 1.0);
        let daily = match self.table.period() {
            MortalityPeriod::Daily => period_survival,
            MortalityPeriod::Monthly => {
                period_survival.powf(1.0 / f64::from(days_in_month(date)))
            }
        };
        (daily, source)
    }

    /// 逐日衰减存栏数量
    ///
    /// 第 k 天 (1..=horizon) 对应 start_date + k;循环内不取整,结果四舍五入且不小于 0
    #[instrument(skip(self))]
    pub fn surviving_count(
        &self,
        count: u64,
        start_date: NaiveDate,
        horizon_days: u32,
        size_code: Option<&str>,
    ) -> SurvivalResult {
        let mut fraction = 1.0_f64;
        let mut used_fallback = false;

        for date in start_date.iter_days().skip(1).take(horizon_days as usize) {
            let (daily, source) = self.daily_survival(date, size_code);
            fraction *= daily;
            used_fallback |= source.is_fallback();
        }

        let surviving = (count as f64 * fraction).round().max(0.0) as u64;
        SurvivalResult {
            surviving,
            survival_fraction: fraction,
            used_fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(n: u32) -> Month {
        Month::from_number(n).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2025, 2, 10)), 28);
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2025, 12, 31)), 31);
        assert_eq!(days_in_month(date(2025, 4, 1)), 30);
    }

    #[test]
    fn test_monthly_rate_over_full_month() {
        let table =
            MortalityRateTable::new(MortalityPeriod::Monthly, vec![(month(1), "T3", 10.0)]).unwrap();
        let projector = MortalityProjector::new(&table, &EngineConfig::default());

        // 12/31 起算,1/1..1/31 整月 → 存活 90%
        let result = projector.surviving_count(10_000, date(2024, 12, 31), 31, Some("T3"));
        assert!((result.survival_fraction - 0.9).abs() < 1e-9);
        assert_eq!(result.surviving, 9_000);
        assert!(!result.used_fallback);
    }

    #[test]
    fn test_daily_rate_compounds_per_day() {
        let table =
            MortalityRateTable::new(MortalityPeriod::Daily, vec![(month(3), "T5", 1.0)]).unwrap();
        let projector = MortalityProjector::new(&table, &EngineConfig::default());

        let result = projector.surviving_count(1_000, date(2025, 3, 1), 10, Some("T5"));
        assert_eq!(result.surviving, (1_000.0 * 0.99f64.powi(10)).round() as u64);
    }

    #[test]
    fn test_never_negative() {
        let table =
            MortalityRateTable::new(MortalityPeriod::Daily, vec![(month(5), "T1", 250.0)]).unwrap();
        let projector = MortalityProjector::new(&table, &EngineConfig::default());

        let result = projector.surviving_count(5_000, date(2025, 5, 1), 3, Some("T1"));
        assert_eq!(result.surviving, 0);
        assert_eq!(result.survival_fraction, 0.0);
    }

    #[test]
    fn test_zero_horizon_keeps_count() {
        let table = MortalityRateTable::empty(MortalityPeriod::Monthly);
        let projector = MortalityProjector::new(&table, &EngineConfig::default());
        let result = projector.surviving_count(777, date(2025, 5, 1), 0, None);
        assert_eq!(result.surviving, 777);
        assert!(!result.used_fallback);
    }

    #[test]
    fn test_fallbacks() {
        // 空表 → 默认常量
        let empty = MortalityRateTable::empty(MortalityPeriod::Daily);
        let config = EngineConfig {
            default_mortality_pct: 2.0,
            ..EngineConfig::default()
        };
        let projector = MortalityProjector::new(&empty, &config);
        let (pct, source) = projector.rate_for(month(1), Some("T1"));
        assert_eq!(pct, 2.0);
        assert_eq!(source, RateSource::DefaultConstant);

        // 缺失 (月份, 规格) → 均值
        let table = MortalityRateTable::new(
            MortalityPeriod::Daily,
            vec![(month(1), "T1", 1.0), (month(2), "T1", 3.0)],
        )
        .unwrap();
        let projector = MortalityProjector::new(&table, &config);
        assert_eq!(projector.rate_for(month(7), Some("T1")), (2.0, RateSource::MonthMean));
        assert_eq!(projector.rate_for(month(1), None), (2.0, RateSource::MonthMean));
        assert_eq!(projector.rate_for(month(1), Some("T1")), (1.0, RateSource::Configured));

        let result = projector.surviving_count(100, date(2025, 6, 30), 2, Some("T1"));
        assert!(result.used_fallback);
    }
}
