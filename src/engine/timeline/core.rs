use crate::config::EngineConfig;
use crate::domain::biometric::{BiometricSnapshot, MG_PER_KG};
use crate::domain::projection::ReachOutcome;
use crate::domain::size_band::SizeBand;
use crate::domain::timeline::{
    MonthBucket, NotReachingTally, TargetSchedule, Timeline, TimelineEntry,
};
use crate::engine::error::ProjectionError;
use crate::engine::inverse_solver::InverseSolver;
use crate::engine::mortality::MortalityProjector;
use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// 单元评估中间结果
// ==========================================

enum UnitEvaluation {
    /// 缺少每公斤只数或存栏数量
    Insufficient { unit_id: String },
    Evaluated {
        unit_id: String,
        population: u64,
        reaches: Vec<UnitReach>,
        used_fallback: bool,
    },
}

struct UnitReach {
    target_index: usize,
    kind: ReachKind,
}

enum ReachKind {
    Reached {
        bucket: MonthBucket,
        surviving: u64,
        weight_mg: f64,
    },
    NotReaching,
}

// ==========================================
// TimelineAggregator - 可售时间表汇总器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TimelineAggregator<'a> {
    solver: InverseSolver<'a>,
    mortality: MortalityProjector<'a>,
    config: &'a EngineConfig,
}

impl<'a> TimelineAggregator<'a> {
    pub fn new(
        solver: InverseSolver<'a>,
        mortality: MortalityProjector<'a>,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            solver,
            mortality,
            config,
        }
    }

    /// 生成可售时间表
    ///
    /// # 参数
    /// - `units`: 各单元最近一次测量快照
    /// - `target_codes`: 目标规格代码 (重复代码只保留第一次出现)
    /// - `reference_date`: 时间表起点 (通常为今天)
    /// - `horizon_months`: 时间表覆盖的月数
    ///
    /// # 返回
    /// - Ok(Timeline): 每个目标规格一份按月时间顺序排列的计划
    /// - Err(ProjectionError): 目标列表为空、规格代码未知或月数越界
    #[instrument(skip(self, units, target_codes), fields(units = units.len(), targets = target_codes.len()))]
    pub fn build(
        &self,
        units: &[BiometricSnapshot],
        target_codes: &[String],
        reference_date: NaiveDate,
        horizon_months: u32,
    ) -> Result<Timeline, ProjectionError> {
        // 1. 校验输入
        if horizon_months == 0 || horizon_months > self.config.max_timeline_months {
            return Err(ProjectionError::InvalidTimelineMonths {
                horizon_months,
                max: self.config.max_timeline_months,
            });
        }
        let targets = self.resolve_targets(target_codes)?;

        // 2. 时间窗口
        let window_end = reference_date
            .checked_add_months(Months::new(horizon_months))
            .unwrap_or(NaiveDate::MAX);

        // 3. 逐单元评估 (并行,collect 保持输入顺序)
        let evaluations: Vec<UnitEvaluation> = units
            .par_iter()
            .map(|snapshot| self.evaluate_unit(snapshot, &targets, reference_date, window_end))
            .collect();

        // 4. 汇总
        let timeline = self.aggregate(evaluations, &targets, reference_date, horizon_months);

        info!(
            schedules = timeline.schedules.len(),
            insufficient = timeline.insufficient_data_units.len(),
            used_fallback_rate = timeline.used_fallback_rate,
            "可售时间表生成完成"
        );
        Ok(timeline)
    }

    /// 解析目标规格代码 (去重,保持顺序)
    fn resolve_targets(&self, target_codes: &[String]) -> Result<Vec<&'a SizeBand>, ProjectionError> {
        if target_codes.is_empty() {
            return Err(ProjectionError::EmptyTargetList);
        }

        let classifier = self.solver.classifier();
        let mut targets: Vec<&'a SizeBand> = Vec::new();
        for code in target_codes {
            let band = classifier
                .find(code)
                .ok_or_else(|| ProjectionError::UnknownSizeBand(code.clone()))?;
            if !targets.iter().any(|t| t.code == band.code) {
                targets.push(band);
            }
        }
        Ok(targets)
    }

    /// 单元求解上限: 测量日到窗口结束的天数,且不超过配置最大值
    fn horizon_cap_for(&self, measured_on: NaiveDate, window_end: NaiveDate) -> u32 {
        let days = (window_end - measured_on).num_days().max(0);
        u32::try_from(days)
            .unwrap_or(u32::MAX)
            .min(self.config.max_horizon_days)
    }

    fn evaluate_unit(
        &self,
        snapshot: &BiometricSnapshot,
        targets: &[&SizeBand],
        reference_date: NaiveDate,
        window_end: NaiveDate,
    ) -> UnitEvaluation {
        let (apk, population) = match (snapshot.usable_animals_per_kg(), snapshot.population) {
            (Some(apk), Some(population)) => (apk, population),
            _ => {
                debug!(unit_id = %snapshot.unit_id, "缺少每公斤只数或存栏数量，跳过");
                return UnitEvaluation::Insufficient {
                    unit_id: snapshot.unit_id.clone(),
                };
            }
        };

        // 死亡率按单元当前规格查找
        let current_size = self.solver.classifier().classify(apk);
        let size_code = current_size.code();
        let cap = self.horizon_cap_for(snapshot.measured_on, window_end);

        let mut used_fallback = false;
        let mut reaches = Vec::with_capacity(targets.len());

        for (target_index, target) in targets.iter().enumerate() {
            let projection = self.solver.solve(snapshot, target, cap);
            used_fallback |= projection.used_fallback_rate;

            let kind = match projection.outcome {
                ReachOutcome::Reached {
                    days,
                    reach_date,
                    weight_mg,
                } => {
                    let survival =
                        self.mortality
                            .surviving_count(population, snapshot.measured_on, days, size_code);
                    used_fallback |= survival.used_fallback;
                    ReachKind::Reached {
                        // 已达标的单元计入起点月份
                        bucket: MonthBucket::of(reach_date.max(reference_date)),
                        surviving: survival.surviving,
                        weight_mg,
                    }
                }
                ReachOutcome::Unreachable { .. } | ReachOutcome::InsufficientData => {
                    ReachKind::NotReaching
                }
            };
            reaches.push(UnitReach { target_index, kind });
        }

        UnitEvaluation::Evaluated {
            unit_id: snapshot.unit_id.clone(),
            population,
            reaches,
            used_fallback,
        }
    }

    fn aggregate(
        &self,
        evaluations: Vec<UnitEvaluation>,
        targets: &[&SizeBand],
        reference_date: NaiveDate,
        horizon_months: u32,
    ) -> Timeline {
        let mut buckets: Vec<BTreeMap<MonthBucket, TimelineEntry>> =
            vec![BTreeMap::new(); targets.len()];
        let mut not_reaching: Vec<NotReachingTally> = vec![NotReachingTally::default(); targets.len()];
        let mut insufficient_data_units = Vec::new();
        let mut used_fallback_rate = false;

        for evaluation in evaluations {
            match evaluation {
                UnitEvaluation::Insufficient { unit_id } => insufficient_data_units.push(unit_id),
                UnitEvaluation::Evaluated {
                    unit_id,
                    population,
                    reaches,
                    used_fallback,
                } => {
                    used_fallback_rate |= used_fallback;
                    for reach in reaches {
                        match reach.kind {
                            ReachKind::Reached {
                                bucket,
                                surviving,
                                weight_mg,
                            } => {
                                let entry = buckets[reach.target_index].entry(bucket).or_insert_with(|| {
                                    TimelineEntry {
                                        target_code: targets[reach.target_index].code.clone(),
                                        bucket,
                                        surviving_population: 0,
                                        projected_biomass_kg: 0.0,
                                        unit_ids: Vec::new(),
                                    }
                                });
                                entry.surviving_population += surviving;
                                entry.projected_biomass_kg += surviving as f64 * weight_mg / MG_PER_KG;
                                entry.unit_ids.push(unit_id.clone());
                            }
                            ReachKind::NotReaching => {
                                let tally = &mut not_reaching[reach.target_index];
                                tally.unit_count += 1;
                                tally.population += population;
                                tally.unit_ids.push(unit_id.clone());
                            }
                        }
                    }
                }
            }
        }

        let schedules = targets
            .iter()
            .zip(buckets)
            .zip(not_reaching)
            .map(|((target, bucket_map), mut tally)| {
                tally.unit_ids.sort();
                let entries = bucket_map
                    .into_values()
                    .map(|mut entry| {
                        entry.unit_ids.sort();
                        entry
                    })
                    .collect();
                TargetSchedule {
                    target_code: target.code.clone(),
                    target_name: target.name.clone(),
                    entries,
                    not_reaching: tally,
                }
            })
            .collect();

        insufficient_data_units.sort();

        Timeline {
            reference_date,
            horizon_months,
            schedules,
            insufficient_data_units,
            used_fallback_rate,
        }
    }
}
