// ==========================================
// FLUPSY 育苗生长预测系统 - 商品规格带
// ==========================================
// 规格带以"每公斤只数"区间定义,上下界均为闭区间
// 每公斤只数越小 = 个体越重
// ==========================================

use crate::domain::biometric::weight_from_animals_per_kg;
use serde::{Deserialize, Serialize};

// ==========================================
// SizeBand - 规格带
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBand {
    pub code: String,             // 规格代码 (如 T1, T3)
    pub name: String,             // 显示名称
    pub min_animals_per_kg: f64,  // 下界 (较重个体一侧)
    pub max_animals_per_kg: f64,  // 上界 (较轻个体一侧)
}

impl SizeBand {
    pub fn new(code: &str, name: &str, min_animals_per_kg: f64, max_animals_per_kg: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            min_animals_per_kg,
            max_animals_per_kg,
        }
    }

    /// 是否包含该每公斤只数 (闭区间)
    pub fn contains(&self, animals_per_kg: f64) -> bool {
        animals_per_kg >= self.min_animals_per_kg && animals_per_kg <= self.max_animals_per_kg
    }

    /// 进入该规格带需要跨越的重量阈值 (mg)
    ///
    /// 取 min_animals_per_kg 对应的个体重量
    pub fn threshold_weight_mg(&self) -> f64 {
        weight_from_animals_per_kg(self.min_animals_per_kg)
    }

    /// 与另一规格带区间是否重叠
    pub fn overlaps(&self, other: &SizeBand) -> bool {
        self.min_animals_per_kg <= other.max_animals_per_kg
            && other.min_animals_per_kg <= self.max_animals_per_kg
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_animals_per_kg.is_finite()
            && self.max_animals_per_kg.is_finite()
            && self.min_animals_per_kg > 0.0
            && self.min_animals_per_kg <= self.max_animals_per_kg
    }
}

// ==========================================
// SizeClass - 分类结果
// ==========================================
// 超出全部规格带不是错误,而是 Unclassified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeClass {
    Band { code: String, name: String },
    Unclassified,
}

impl SizeClass {
    pub fn from_band(band: &SizeBand) -> Self {
        SizeClass::Band {
            code: band.code.clone(),
            name: band.name.clone(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            SizeClass::Band { code, .. } => Some(code.as_str()),
            SizeClass::Unclassified => None,
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, SizeClass::Unclassified)
    }
}
