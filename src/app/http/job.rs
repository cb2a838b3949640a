// ==========================================
// 优化任务相关处理器
// ==========================================

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::api::dto::{
    CreateJobRequest, JobListQuery, MessageResponse, TransitionResponse, UpdateJobRequest,
};
use crate::api::error::ApiResult;
use crate::app::http::common::{run_blocking, ApiJson, ApiPath, ApiQuery};
use crate::app::state::AppState;
use crate::domain::job::{OptimizationJob, OptimizationJobWithDetails};

/// GET /jobs?status&skip&limit
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<JobListQuery>,
) -> ApiResult<Json<Vec<OptimizationJobWithDetails>>> {
    let (skip, limit) = state.page_limits.resolve(query.skip, query.limit);
    let api = state.job_api.clone();
    let jobs = run_blocking(move || api.list_jobs(query.status.as_deref(), skip, limit)).await?;
    Ok(Json(jobs))
}

/// GET /jobs/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ApiResult<Json<OptimizationJobWithDetails>> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.get_job(&job_id)).await?;
    Ok(Json(job))
}

/// POST /jobs
pub async fn create_job(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<OptimizationJob>)> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.create_job(req)).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /jobs/{job_id}
pub async fn update_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
    ApiJson(req): ApiJson<UpdateJobRequest>,
) -> ApiResult<Json<OptimizationJob>> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.update_job(&job_id, req)).await?;
    Ok(Json(job))
}

/// DELETE /jobs/{job_id}
pub async fn delete_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    let api = state.job_api.clone();
    run_blocking(move || api.delete_job(&job_id)).await?;
    Ok(Json(MessageResponse::new("Optimization job deleted successfully")))
}

/// POST /jobs/{job_id}/start
pub async fn start_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ApiResult<Json<TransitionResponse>> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.start_job(&job_id)).await?;
    Ok(Json(TransitionResponse {
        message: "Job started successfully".to_string(),
        job,
    }))
}

/// POST /jobs/{job_id}/stop
pub async fn stop_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ApiResult<Json<TransitionResponse>> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.stop_job(&job_id)).await?;
    Ok(Json(TransitionResponse {
        message: "Job stopped successfully".to_string(),
        job,
    }))
}

/// POST /jobs/{job_id}/complete
///
/// 请求体为任意 JSON 结果，原样保存
pub async fn complete_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
    ApiJson(results): ApiJson<Value>,
) -> ApiResult<Json<TransitionResponse>> {
    let api = state.job_api.clone();
    let job = run_blocking(move || api.complete_job(&job_id, results)).await?;
    Ok(Json(TransitionResponse {
        message: "Job completed successfully".to_string(),
        job,
    }))
}
