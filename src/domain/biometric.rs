// ==========================================
// FLUPSY 育苗生长预测系统 - 生物测量快照
// ==========================================
// 职责: 单元最近一次生物测量 (只读,由外部测量子系统产生)
// 换算: 1 kg = 1,000,000 mg, 个体重量(mg) = 1,000,000 / 每公斤只数
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 每公斤毫克数
pub const MG_PER_KG: f64 = 1_000_000.0;

/// 每公斤只数 → 个体重量 (mg)
pub fn weight_from_animals_per_kg(animals_per_kg: f64) -> f64 {
    MG_PER_KG / animals_per_kg
}

/// 个体重量 (mg) → 每公斤只数
pub fn animals_per_kg_from_weight(weight_mg: f64) -> f64 {
    MG_PER_KG / weight_mg
}

// ==========================================
// BiometricSnapshot - 生物测量快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricSnapshot {
    pub unit_id: String,              // 育苗单元 (篮/筐) ID
    pub cycle_id: Option<String>,     // 所属生产周期
    pub measured_on: NaiveDate,       // 测量日期
    pub animals_per_kg: Option<f64>,  // 每公斤只数 (缺失则无法预测)
    pub weight_mg: Option<f64>,       // 记录的个体重量,仅供展示
    pub population: Option<u64>,      // 存栏数量
}

impl BiometricSnapshot {
    /// 可用于预测的每公斤只数
    ///
    /// 缺失、非正数或非有限值均视为不可用
    pub fn usable_animals_per_kg(&self) -> Option<f64> {
        self.animals_per_kg
            .filter(|apk| apk.is_finite() && *apk > 0.0)
    }

    /// 可用于预测的当前个体重量 (mg)
    ///
    /// 由每公斤只数推导,不使用 weight_mg 字段
    pub fn current_weight_mg(&self) -> Option<f64> {
        self.usable_animals_per_kg().map(weight_from_animals_per_kg)
    }

    pub fn has_usable_measurement(&self) -> bool {
        self.usable_animals_per_kg().is_some()
    }
}
