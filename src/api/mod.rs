// ==========================================
// 总装排产优化系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 处理器调用
// ==========================================

pub mod configuration_api;
pub mod dto;
pub mod error;
pub mod job_api;
pub mod plan_api;
pub mod validator;

// 重导出核心类型
pub use configuration_api::ConfigurationApi;
pub use error::{ApiError, ApiResult};
pub use job_api::OptimizationJobApi;
pub use plan_api::PlanApi;
