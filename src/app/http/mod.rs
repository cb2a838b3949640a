// ==========================================
// 总装排产优化系统 - HTTP 接口层
// ==========================================
// 职责: 路由注册，请求 → API 调用 → JSON 响应
// 错误: ApiError → HTTP 状态码 + ErrorResponse
// ==========================================

pub mod common;
pub mod configuration;
pub mod job;
pub mod plan;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};

use crate::api::dto::{HealthResponse, RootResponse};
use crate::app::state::AppState;

pub use common::{ApiJson, ApiPath, ApiQuery, ErrorResponse, REQUEST_ID_HEADER};

/// 计划文件上传大小上限
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 构建完整路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // ===== 生产计划 =====
        .route("/plans", get(plan::list_plans).post(plan::create_plan))
        .route(
            "/plans/import",
            post(plan::import_plan).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/plans/{id}",
            get(plan::get_plan)
                .put(plan::update_plan)
                .delete(plan::delete_plan),
        )
        // ===== 排产配置 =====
        .route(
            "/configurations",
            get(configuration::list_configurations).post(configuration::create_configuration),
        )
        .route(
            "/configurations/{id}",
            get(configuration::get_configuration)
                .put(configuration::update_configuration)
                .delete(configuration::delete_configuration),
        )
        // ===== 优化任务 =====
        .route("/jobs", get(job::list_jobs).post(job::create_job))
        .route(
            "/jobs/{job_id}",
            get(job::get_job).put(job::update_job).delete(job::delete_job),
        )
        .route("/jobs/{job_id}/start", post(job::start_job))
        .route("/jobs/{job_id}/stop", post(job::stop_job))
        .route("/jobs/{job_id}/complete", post(job::complete_job))
        .layer(middleware::from_fn(common::trace_request))
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Assembly APS Optimization API".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
