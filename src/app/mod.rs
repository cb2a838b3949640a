// ==========================================
// 总装排产优化系统 - 应用层
// ==========================================
// 职责: HTTP 集成,连接调用方与后端 API
// ==========================================

pub mod http;
pub mod server;
pub mod state;

// 重导出
pub use http::build_router;
pub use server::serve;
pub use state::AppState;
