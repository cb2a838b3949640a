// ==========================================
// 总装排产优化系统 - 配置层
// ==========================================
// 职责: 服务启动配置（环境变量）
// ==========================================

pub mod server_config;

// 重导出核心配置
pub use server_config::{get_default_db_path, LogFormat, PageLimits, ServerConfig};
