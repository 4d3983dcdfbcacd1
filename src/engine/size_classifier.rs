// ==========================================
// FLUPSY 育苗生长预测系统 - 规格分类器
// ==========================================
// 职责: 每公斤只数 → 商品规格带
// 输入: 规格带配置快照 (只读)
// 输出: SizeClass (Band / Unclassified)
// ==========================================
// 规则: 闭区间匹配;配置重叠时按"个体重量升序"取第一个命中
// ==========================================

use crate::domain::biometric::animals_per_kg_from_weight;
use crate::domain::size_band::{SizeBand, SizeClass};
use std::cmp::Ordering;

// ==========================================
// SizeClassifier - 规格分类器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SizeClassifier {
    // 按个体重量升序 (max_animals_per_kg 降序) 排列
    bands: Vec<SizeBand>,
}

/// 个体重量升序: 上界大的在前,其次下界大的在前,最后按代码
fn ascending_weight(a: &SizeBand, b: &SizeBand) -> Ordering {
    b.max_animals_per_kg
        .total_cmp(&a.max_animals_per_kg)
        .then_with(|| b.min_animals_per_kg.total_cmp(&a.min_animals_per_kg))
        .then_with(|| a.code.cmp(&b.code))
}

impl SizeClassifier {
    /// 由规格带配置构造
    ///
    /// 不修改入参;区间无效的规格带跳过并告警,重叠的规格带仅告警
    pub fn new(bands: &[SizeBand]) -> Self {
        let mut sorted: Vec<SizeBand> = bands
            .iter()
            .filter(|band| {
                let ok = band.is_well_formed();
                if !ok {
                    tracing::warn!(
                        code = %band.code,
                        min = band.min_animals_per_kg,
                        max = band.max_animals_per_kg,
                        "规格带区间无效，已忽略"
                    );
                }
                ok
            })
            .cloned()
            .collect();
        sorted.sort_by(ascending_weight);

        let classifier = Self { bands: sorted };
        for (a, b) in classifier.overlapping_pairs() {
            tracing::warn!(first = %a, second = %b, "规格带区间重叠，按个体重量升序取先命中者");
        }
        classifier
    }

    /// 按每公斤只数分类
    ///
    /// # 返回
    /// - SizeClass::Band: 第一个包含该值的规格带
    /// - SizeClass::Unclassified: 无命中 (含非正数、NaN)
    pub fn classify(&self, animals_per_kg: f64) -> SizeClass {
        self.find_band_for(animals_per_kg)
            .map(SizeClass::from_band)
            .unwrap_or(SizeClass::Unclassified)
    }

    /// 按个体重量 (mg) 分类
    pub fn classify_weight(&self, weight_mg: f64) -> SizeClass {
        if !(weight_mg.is_finite() && weight_mg > 0.0) {
            return SizeClass::Unclassified;
        }
        self.classify(animals_per_kg_from_weight(weight_mg))
    }

    /// 返回命中的规格带
    pub fn find_band_for(&self, animals_per_kg: f64) -> Option<&SizeBand> {
        if !(animals_per_kg.is_finite() && animals_per_kg > 0.0) {
            return None;
        }
        self.bands.iter().find(|band| band.contains(animals_per_kg))
    }

    /// 按代码查找规格带
    pub fn find(&self, code: &str) -> Option<&SizeBand> {
        self.bands.iter().find(|band| band.code == code)
    }

    /// 已排序的规格带
    pub fn bands(&self) -> &[SizeBand] {
        &self.bands
    }

    /// 区间重叠的规格带对 (按排序后的顺序)
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.bands.iter().enumerate() {
            for b in &self.bands[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.code.clone(), b.code.clone()));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_bands() -> Vec<SizeBand> {
        // 故意乱序传入
        vec![
            SizeBand::new("T3", "T3", 6001.0, 19000.0),
            SizeBand::new("T10", "T10", 1001.0, 3000.0),
            SizeBand::new("T1", "T1", 19001.0, 40000.0),
            SizeBand::new("T5", "T5", 3001.0, 6000.0),
        ]
    }

    #[test]
    fn test_classify_inclusive_bounds() {
        let classifier = SizeClassifier::new(&standard_bands());
        assert_eq!(classifier.classify(19000.0).code(), Some("T3"));
        assert_eq!(classifier.classify(19001.0).code(), Some("T1"));
        assert_eq!(classifier.classify(6001.0).code(), Some("T3"));
        assert_eq!(classifier.classify(40000.0).code(), Some("T1"));
    }

    #[test]
    fn test_values_outside_every_band_are_unclassified() {
        let classifier = SizeClassifier::new(&standard_bands());
        // 个体过大
        assert!(classifier.classify(500.0).is_unclassified());
        // 个体过小
        assert!(classifier.classify(80000.0).is_unclassified());
        // 区间之间的空隙
        assert!(classifier.classify(19000.5).is_unclassified());
        assert!(classifier.classify(0.0).is_unclassified());
        assert!(classifier.classify(f64::NAN).is_unclassified());
    }

    #[test]
    fn test_sorted_by_ascending_weight() {
        let classifier = SizeClassifier::new(&standard_bands());
        let codes: Vec<&str> = classifier.bands().iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["T1", "T3", "T5", "T10"]);
    }

    #[test]
    fn test_overlap_tie_break_prefers_lighter_band() {
        let bands = vec![
            SizeBand::new("HEAVY", "heavy", 5000.0, 12000.0),
            SizeBand::new("LIGHT", "light", 10000.0, 20000.0),
        ];
        let classifier = SizeClassifier::new(&bands);
        assert_eq!(classifier.overlapping_pairs().len(), 1);
        // 11000 同时落在两个区间,轻的一侧优先
        assert_eq!(classifier.classify(11000.0).code(), Some("LIGHT"));
        assert_eq!(classifier.classify(9000.0).code(), Some("HEAVY"));
    }

    #[test]
    fn test_malformed_band_is_skipped() {
        let bands = vec![
            SizeBand::new("BAD", "bad", 3000.0, 1000.0),
            SizeBand::new("OK", "ok", 1000.0, 3000.0),
        ];
        let classifier = SizeClassifier::new(&bands);
        assert_eq!(classifier.bands().len(), 1);
        assert!(classifier.find("BAD").is_none());
    }

    #[test]
    fn test_classified_band_always_contains_value() {
        let classifier = SizeClassifier::new(&standard_bands());
        let mut v = 100.0;
        while v < 100_000.0 {
            match classifier.find_band_for(v) {
                Some(band) => assert!(band.contains(v)),
                None => assert!(classifier.bands().iter().all(|b| !b.contains(v))),
            }
            v *= 1.07;
        }
    }

    #[test]
    fn test_classify_weight() {
        let classifier = SizeClassifier::new(&standard_bands());
        // 125mg = 8000 只/kg
        assert_eq!(classifier.classify_weight(125.0).code(), Some("T3"));
        assert!(classifier.classify_weight(0.0).is_unclassified());
    }
}
