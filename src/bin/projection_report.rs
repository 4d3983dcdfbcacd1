// ==========================================
// FLUPSY 育苗生长预测系统 - 可售时间表报表工具
// ==========================================
// 职责: 以 JSON 输出全部进行中单元的可售时间表
// 用法: projection_report [db_path] [horizon_months] [target_code ...]
// 规则: 未指定目标规格时使用全部已配置规格带
// ==========================================

use flupsy_growth::app::{get_default_db_path, AppState};
use flupsy_growth::logging;
use flupsy_growth::repository::SizeBandRepository;
use std::error::Error;

const DEFAULT_HORIZON_MONTHS: i64 = 6;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(get_default_db_path);
    let horizon_months = match args.next() {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid horizon_months {:?}: {}", raw, e))?,
        None => DEFAULT_HORIZON_MONTHS,
    };
    let mut target_codes: Vec<String> = args.collect();

    if target_codes.is_empty() {
        target_codes = SizeBandRepository::new(&db_path)?
            .list_all()?
            .into_iter()
            .map(|band| band.code)
            .collect();
    }

    tracing::info!(
        "{} v{} | db={} | months={} | targets={:?}",
        flupsy_growth::APP_NAME,
        flupsy_growth::VERSION,
        db_path,
        horizon_months,
        target_codes
    );

    let state = AppState::new(db_path)?;
    let response = state
        .timeline_api
        .build_timeline(&target_codes, horizon_months, None)
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
