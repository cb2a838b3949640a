// ==========================================
// 总装排产优化系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 共享: 单个 SQLite 连接 Arc<Mutex<Connection>>，由各仓储共用
// ==========================================

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigurationApi, OptimizationJobApi, PlanApi};
use crate::config::PageLimits;
use crate::db::{init_schema, open_in_memory, open_sqlite_connection, read_schema_version};
use crate::repository::{ConfigurationRepository, OptimizationJobRepository, PlanRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源，作为 axum Router 的 State（克隆开销为若干 Arc）
#[derive(Clone)]
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    /// 生产计划API
    pub plan_api: Arc<PlanApi>,

    /// 排产配置API
    pub configuration_api: Arc<ConfigurationApi>,

    /// 优化任务API
    pub job_api: Arc<OptimizationJobApi>,

    /// 分页限制
    pub page_limits: PageLimits,
}

impl AppState {
    /// 打开（必要时创建）数据库文件并初始化AppState
    pub fn new(db_path: &str, page_limits: PageLimits) -> Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        init_schema(&conn).context("数据库表结构初始化失败")?;

        let version = read_schema_version(&conn).context("读取 schema_version 失败")?;
        tracing::info!(?version, "数据库表结构就绪");

        Ok(Self::from_connection(conn, db_path.to_string(), page_limits))
    }

    /// 基于内存数据库创建AppState（测试使用）
    pub fn in_memory() -> Result<Self> {
        let conn = open_in_memory().context("无法创建内存数据库")?;
        Ok(Self::from_connection(
            conn,
            ":memory:".to_string(),
            PageLimits::default(),
        ))
    }

    /// 基于已初始化的连接组装仓储与API
    pub fn from_connection(conn: Connection, db_path: String, page_limits: PageLimits) -> Self {
        let conn = Arc::new(Mutex::new(conn));

        let plan_repo = Arc::new(PlanRepository::new(conn.clone()));
        let config_repo = Arc::new(ConfigurationRepository::new(conn.clone()));
        let job_repo = Arc::new(OptimizationJobRepository::new(conn));

        let plan_api = Arc::new(PlanApi::new(plan_repo.clone()));
        let configuration_api = Arc::new(ConfigurationApi::new(config_repo.clone()));
        let job_api = Arc::new(OptimizationJobApi::new(job_repo, plan_repo, config_repo));

        Self {
            db_path,
            plan_api,
            configuration_api,
            job_api,
            page_limits,
        }
    }
}
