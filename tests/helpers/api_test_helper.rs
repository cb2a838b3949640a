// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use assembly_aps::api::dto::{CreateConfigurationRequest, CreateJobRequest, CreatePlanRequest};
use assembly_aps::api::{ApiError, ConfigurationApi, OptimizationJobApi, PlanApi};
use assembly_aps::app::AppState;
use assembly_aps::config::PageLimits;
use assembly_aps::db::open_sqlite_connection;
use assembly_aps::domain::{Configuration, OptimizationJob, ProductionPlan};
use assembly_aps::repository::{
    ConfigurationRepository, OptimizationJobRepository, PlanRepository,
};

pub use test_helpers::{capacity, line_item, sample_calendar, sample_line_items};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,
    pub plan_api: Arc<PlanApi>,
    pub configuration_api: Arc<ConfigurationApi>,
    pub job_api: Arc<OptimizationJobApi>,

    // Repository层（用于测试数据准备与校验，独立连接）
    pub plan_repo: Arc<PlanRepository>,
    pub config_repo: Arc<ConfigurationRepository>,
    pub job_repo: Arc<OptimizationJobRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的测试环境
    pub fn new() -> Result<Self, String> {
        Self::with_page_limits(PageLimits::default())
    }

    /// 以指定分页限制创建测试环境
    pub fn with_page_limits(page_limits: PageLimits) -> Result<Self, String> {
        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let state = AppState::new(&db_path, page_limits)
            .map_err(|e| format!("创建AppState失败: {:#}", e))?;

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("打开数据库连接失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            db_path,
            plan_api: state.plan_api.clone(),
            configuration_api: state.configuration_api.clone(),
            job_api: state.job_api.clone(),
            state,
            plan_repo: Arc::new(PlanRepository::new(conn.clone())),
            config_repo: Arc::new(ConfigurationRepository::new(conn.clone())),
            job_repo: Arc::new(OptimizationJobRepository::new(conn)),
            _temp_file: temp_file,
        })
    }

    /// 准备一个生产计划
    pub fn prepare_plan(&self, name: &str) -> ProductionPlan {
        self.plan_api
            .create_plan(CreatePlanRequest {
                name: name.to_string(),
                created_by: "Nguyễn Văn A".to_string(),
                data: sample_line_items(),
            })
            .expect("准备计划失败")
    }

    /// 准备一个排产配置
    pub fn prepare_configuration(&self, name: &str) -> Configuration {
        self.configuration_api
            .create_configuration(CreateConfigurationRequest {
                name: name.to_string(),
                created_by: "Trần Thị B".to_string(),
                workshop: Some("GA".to_string()),
                ga_config: capacity(100, 20, 30.0),
                body_config: capacity(80, 15, 45.0),
                calendar_days: sample_calendar(),
            })
            .expect("准备配置失败")
    }

    /// 准备一个计划+配置+任务（NOT_OPTIMIZED）
    pub fn prepare_job(&self) -> OptimizationJob {
        let plan = self.prepare_plan("KHSX Tháng 4/2025");
        let config = self.prepare_configuration("Cấu hình GA-01");
        self.job_api
            .create_job(CreateJobRequest {
                plan_id: plan.id,
                config_id: config.id,
                created_by: "Lê Văn C".to_string(),
            })
            .expect("准备任务失败")
    }
}

// ==========================================
// 断言辅助
// ==========================================

pub fn assert_not_found(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::NotFound(_)) => {}
        other => panic!("期望 NotFound，实际: {:?}", other),
    }
}

pub fn assert_invalid_state(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::InvalidStateTransition { .. }) => {}
        other => panic!("期望 InvalidStateTransition，实际: {:?}", other),
    }
}

pub fn assert_validation_error(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::ValidationError(_)) => {}
        other => panic!("期望 ValidationError，实际: {:?}", other),
    }
}

pub fn assert_conflict(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::Conflict(_)) => {}
        other => panic!("期望 Conflict，实际: {:?}", other),
    }
}
