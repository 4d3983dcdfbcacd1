// ==========================================
// FLUPSY 育苗生长预测系统 - 可售时间表
// ==========================================
// 职责: 多单元按目标规格、按月汇总的可售进度
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// MonthBucket - 月度时间桶
// ==========================================
// 排序: 先年后月,即时间顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32, // 1..=12
}

impl MonthBucket {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// TimelineEntry - 时间表条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub target_code: String,
    pub bucket: MonthBucket,
    pub surviving_population: u64,  // 到达日存活数量合计
    pub projected_biomass_kg: f64,  // 存活数量 × 到达重量
    pub unit_ids: Vec<String>,      // 贡献单元 (顺序无业务含义)
}

/// 目标规格在上限内不可达的单元统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotReachingTally {
    pub unit_count: usize,
    pub population: u64,
    pub unit_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSchedule {
    pub target_code: String,
    pub target_name: String,
    pub entries: Vec<TimelineEntry>, // 按时间顺序
    pub not_reaching: NotReachingTally,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub reference_date: NaiveDate,
    pub horizon_months: u32,
    pub schedules: Vec<TargetSchedule>, // 与请求的目标规格顺序一致
    pub insufficient_data_units: Vec<String>,
    pub used_fallback_rate: bool,
}

impl Timeline {
    pub fn schedule(&self, target_code: &str) -> Option<&TargetSchedule> {
        self.schedules.iter().find(|s| s.target_code == target_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bucket_ordering_is_chronological() {
        let dec = MonthBucket::of(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let jan = MonthBucket::of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2025-01");
    }
}
