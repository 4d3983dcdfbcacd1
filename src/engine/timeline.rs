// ==========================================
// FLUPSY 育苗生长预测系统 - 可售时间表汇总
// ==========================================
// 职责: 多单元 × 多目标规格 → 按月汇总的可售进度
// 输入: 各单元最近测量快照 + 目标规格代码 + 月数
// 输出: Timeline (按目标规格,按月时间顺序)
// ==========================================
// 注: 单元之间、目标规格之间互不依赖,按单元并行计算
// ==========================================

mod core;


pub use self::core::TimelineAggregator;
