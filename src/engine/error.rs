// ==========================================
// FLUPSY 育苗生长预测系统 - 引擎层错误类型
// ==========================================
// 只有格式错误的输入才是错误;
// 数据不足 / 未分类 / 不可达 属于领域结果,不走这里
// ==========================================

use crate::domain::rate_table::RateTableError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("未知的规格代码: {0}")]
    UnknownSizeBand(String),

    #[error("预测天数超出上限: horizon_days={horizon_days}, max={max}")]
    HorizonTooLarge { horizon_days: u32, max: u32 },

    #[error("时间表月数无效: horizon_months={horizon_months}, 允许范围 1..={max}")]
    InvalidTimelineMonths { horizon_months: u32, max: u32 },

    #[error("目标规格列表为空")]
    EmptyTargetList,

    #[error("情景浮动百分比无效: best={best_pct}, worst={worst_pct}")]
    InvalidVariation { best_pct: f64, worst_pct: f64 },

    #[error("费率表无效: {0}")]
    InvalidRate(#[from] RateTableError),
}
