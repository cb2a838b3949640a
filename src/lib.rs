// ==========================================
// 总装排产优化系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 生产计划/排产配置/优化任务管理后端
// 优化计算由外部优化器完成，本系统只负责任务生命周期与结果存储
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 计划文件
pub mod importer;

// 配置层 - 启动配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 示例数据
pub mod seed;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{JobStatus, Workshop};

// 领域实体
pub use domain::{
    CalendarDay, Configuration, JobTransition, LineCapacityConfig, OptimizationJob,
    OptimizationJobWithDetails, PlanLineItem, ProductionPlan,
};

// API
pub use api::{ApiError, ApiResult, ConfigurationApi, OptimizationJobApi, PlanApi};

// 应用
pub use app::{build_router, AppState};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const SYSTEM_NAME: &str = "总装排产优化系统";
