// ==========================================
// FLUPSY 育苗生长预测系统 - 预测配置读取 Trait
// ==========================================
// 职责: 定义预测引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::domain::types::{GrowthRateUnit, MortalityPeriod, ScenarioVariation};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::error::Error;

// ==========================================
// ProjectionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ProjectionConfigReader: Send + Sync {
    /// 获取生长率表为空时的默认日增长率
    ///
    /// # 默认值
    /// - 0.02
    async fn get_default_daily_growth_rate(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 获取死亡率表为空时的默认周期死亡率 (%)
    ///
    /// # 默认值
    /// - 1.0
    async fn get_default_mortality_pct(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 获取目标规格求解的默认上限天数
    ///
    /// # 默认值
    /// - 365
    async fn get_horizon_cap_days(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 获取任意模拟允许的最大天数
    ///
    /// # 默认值
    /// - 1095
    async fn get_max_horizon_days(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 获取时间表允许的最大月数
    ///
    /// # 默认值
    /// - 24
    async fn get_max_timeline_months(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 获取 growth_rate 表的存储单位
    ///
    /// # 默认值
    /// - DAILY_FRACTION
    async fn get_growth_rate_unit(&self) -> Result<GrowthRateUnit, Box<dyn Error + Send + Sync>>;

    /// 获取 mortality_rate 表的周期语义
    ///
    /// # 默认值
    /// - MONTHLY
    async fn get_mortality_period(&self)
        -> Result<MortalityPeriod, Box<dyn Error + Send + Sync>>;

    /// 获取默认情景浮动百分比
    ///
    /// # 默认值
    /// - best 20%, worst 20%
    async fn get_default_variation(
        &self,
    ) -> Result<ScenarioVariation, Box<dyn Error + Send + Sync>>;

    /// 获取全部 global 配置的原始值快照
    ///
    /// # 用途
    /// - 时间表报表中记录本次使用的配置
    async fn get_config_snapshot(
        &self,
    ) -> Result<BTreeMap<String, String>, Box<dyn Error + Send + Sync>>;

    /// 组装完整的引擎配置
    ///
    /// # 逻辑
    /// 1. 逐项读取 (缺省项回退为默认值)
    /// 2. 校验自洽性
    async fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error + Send + Sync>> {
        let config = EngineConfig {
            default_daily_growth_rate: self.get_default_daily_growth_rate().await?,
            default_mortality_pct: self.get_default_mortality_pct().await?,
            horizon_cap_days: self.get_horizon_cap_days().await?,
            max_horizon_days: self.get_max_horizon_days().await?,
            max_timeline_months: self.get_max_timeline_months().await?,
            growth_rate_unit: self.get_growth_rate_unit().await?,
            mortality_period: self.get_mortality_period().await?,
            default_variation: self.get_default_variation().await?,
        };
        config.validate()?;
        Ok(config)
    }
}
