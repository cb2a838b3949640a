// ==========================================
// 总装排产优化系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、任务状态机
// 红线: 不含数据访问逻辑
// ==========================================

pub mod configuration;
pub mod job;
pub mod plan;
pub mod types;

// 重导出核心类型
pub use configuration::{CalendarDay, Configuration, LineCapacityConfig};
pub use job::{
    format_job_id, job_id_prefix, InvalidTransition, JobTransition, OptimizationJob,
    OptimizationJobWithDetails,
};
pub use plan::{PlanLineItem, ProductionPlan};
pub use types::{JobStatus, Workshop};
