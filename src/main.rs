// ==========================================
// 总装排产优化系统 - 服务主入口
// ==========================================
// 启动顺序: 环境配置 → 日志 → AppState → HTTP 服务
// ==========================================

use anyhow::Result;
use assembly_aps::app::{serve, AppState};
use assembly_aps::config::ServerConfig;
use assembly_aps::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    // 初始化日志系统
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", assembly_aps::SYSTEM_NAME);
    tracing::info!("系统版本: {}", assembly_aps::VERSION);
    tracing::info!("==================================================");

    tracing::info!("使用数据库: {}", config.db_path);
    let state = AppState::new(&config.db_path, config.page_limits)?;

    serve(config.addr, state).await
}
