// ==========================================
// 总装排产优化系统 - 示例数据初始化
// ==========================================
// 用法: seed_sample_data [db_path]
// 库中已有任何计划/配置/任务时跳过，不覆盖已有数据
// ==========================================

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};

use assembly_aps::config::get_default_db_path;
use assembly_aps::db::{init_schema, open_sqlite_connection};
use assembly_aps::logging;
use assembly_aps::seed::seed_sample_data;

fn main() -> Result<()> {
    logging::init(Default::default());

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("示例数据初始化，数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库表结构初始化失败")?;

    match seed_sample_data(Arc::new(Mutex::new(conn)))? {
        Some(report) => tracing::info!(jobs = ?report.job_ids, "示例数据已写入"),
        None => tracing::info!("未写入示例数据"),
    }

    Ok(())
}
