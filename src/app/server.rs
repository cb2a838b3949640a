// ==========================================
// 总装排产优化系统 - HTTP 服务启动
// ==========================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::http::build_router;
use crate::app::state::AppState;

/// 绑定地址并运行服务，直到收到 Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定监听地址 {}", addr))?;
    let actual_addr = listener.local_addr()?;

    info!(addr = %actual_addr, db_path = %state.db_path, "HTTP 服务已启动");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("监听 Ctrl-C 失败: {}", e);
        // 无法监听信号时保持运行
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，等待进行中的请求完成");
}
