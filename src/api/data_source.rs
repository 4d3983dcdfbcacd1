// ==========================================
// FLUPSY 育苗生长预测系统 - 预测数据源
// ==========================================
// 职责: 每次调用加载一份只读快照 (配置 + 规格带 + 费率表),
//       交给引擎做纯计算
// 约束: 不缓存;缓存由调用方决定
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, EngineConfig, ProjectionConfigReader};
use crate::domain::biometric::BiometricSnapshot;
use crate::domain::size_band::SizeBand;
use crate::engine::ProjectionContext;
use crate::repository::{BiometricRepository, RateTableRepository, SizeBandRepository};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub struct ProjectionDataSource {
    biometric_repo: Arc<BiometricRepository>,
    size_band_repo: Arc<SizeBandRepository>,
    rate_table_repo: Arc<RateTableRepository>,
    config_reader: Arc<dyn ProjectionConfigReader>,
}

impl ProjectionDataSource {
    pub fn new(
        biometric_repo: Arc<BiometricRepository>,
        size_band_repo: Arc<SizeBandRepository>,
        rate_table_repo: Arc<RateTableRepository>,
        config_reader: Arc<dyn ProjectionConfigReader>,
    ) -> Self {
        Self {
            biometric_repo,
            size_band_repo,
            rate_table_repo,
            config_reader,
        }
    }

    /// 打开数据库并让所有仓储共享同一连接
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseError(format!("打开数据库失败: {}", e)))?;
        crate::db::warn_on_schema_mismatch(&conn)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let conn = Arc::new(Mutex::new(conn));
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(BiometricRepository::from_connection(conn.clone())),
            Arc::new(SizeBandRepository::from_connection(conn.clone())),
            Arc::new(RateTableRepository::from_connection(conn)),
            Arc::new(config_manager),
        ))
    }

    async fn load_config(&self) -> ApiResult<EngineConfig> {
        self.config_reader
            .load_engine_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    async fn load_size_bands(&self) -> ApiResult<Vec<SizeBand>> {
        Ok(self.size_band_repo.list_all()?)
    }

    /// 加载本次调用的预测上下文
    pub async fn load_context(&self) -> ApiResult<ProjectionContext> {
        let (config, bands) = futures::try_join!(self.load_config(), self.load_size_bands())?;

        let growth = self.rate_table_repo.load_growth_table(config.growth_rate_unit)?;
        let mortality = self.rate_table_repo.load_mortality_table(config.mortality_period)?;

        tracing::debug!(
            bands = bands.len(),
            growth_months = growth.len(),
            mortality_entries = mortality.len(),
            "预测上下文加载完成"
        );
        Ok(ProjectionContext::new(&bands, growth, mortality, config))
    }

    /// 全部 global 配置原始值
    pub async fn config_snapshot(&self) -> ApiResult<BTreeMap<String, String>> {
        self.config_reader
            .get_config_snapshot()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 单元进行中周期的最近一次测量,无记录时返回 NotFound
    pub fn latest_snapshot(&self, unit_id: &str) -> ApiResult<BiometricSnapshot> {
        self.biometric_repo
            .find_latest_by_unit(unit_id)?
            .ok_or_else(|| ApiError::NotFound(format!("单元{}没有进行中周期的测量记录", unit_id)))
    }

    /// 进行中生产周期的全部单元最近测量
    pub fn latest_active_snapshots(&self) -> ApiResult<Vec<BiometricSnapshot>> {
        Ok(self.biometric_repo.find_latest_active()?)
    }
}
