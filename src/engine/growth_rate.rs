// ==========================================
// FLUPSY 育苗生长预测系统 - 生长率解析
// ==========================================
// 职责: 日期 → 日增长率
// 规则: 命中月份 → 配置值;缺失月份 → 已配置费率均值;空表 → 默认常量
// 约束: 按数字月份索引查找,不依赖区域设置
// ==========================================

use crate::config::EngineConfig;
use crate::domain::rate_table::GrowthRateTable;
use crate::domain::types::{Month, RateSource};
use chrono::NaiveDate;

/// 解析后的日增长率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    pub daily_rate: f64,
    pub source: RateSource,
}

// ==========================================
// GrowthRateProvider - 生长率解析器
// ==========================================
// 只借用费率表,调用之间不保留任何状态
#[derive(Debug, Clone, Copy)]
pub struct GrowthRateProvider<'a> {
    table: &'a GrowthRateTable,
    fallback: ResolvedRate,
}

impl<'a> GrowthRateProvider<'a> {
    pub fn new(table: &'a GrowthRateTable, config: &EngineConfig) -> Self {
        let fallback = match table.mean() {
            Some(mean) => ResolvedRate {
                daily_rate: mean,
                source: RateSource::MonthMean,
            },
            None => ResolvedRate {
                daily_rate: config.default_daily_growth_rate,
                source: RateSource::DefaultConstant,
            },
        };
        Self { table, fallback }
    }

    /// 按月份解析
    pub fn rate_for_month(&self, month: Month) -> ResolvedRate {
        match self.table.get(month) {
            Some(rate) => ResolvedRate {
                daily_rate: rate,
                source: RateSource::Configured,
            },
            None => self.fallback,
        }
    }

    /// 按日期解析 (取该日期所在月份)
    pub fn rate_for_date(&self, date: NaiveDate) -> ResolvedRate {
        self.rate_for_month(Month::of(date))
    }
}
