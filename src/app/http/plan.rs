// ==========================================
// 生产计划相关处理器
// ==========================================

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::api::dto::{
    CreatePlanRequest, ImportPlanQuery, ListQuery, MessageResponse, UpdatePlanRequest,
};
use crate::api::error::ApiResult;
use crate::app::http::common::{run_blocking, ApiJson, ApiPath, ApiQuery};
use crate::app::state::AppState;
use crate::domain::plan::ProductionPlan;

/// GET /plans
pub async fn list_plans(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Vec<ProductionPlan>>> {
    let (skip, limit) = state.page_limits.resolve(query.skip, query.limit);
    let api = state.plan_api.clone();
    let plans = run_blocking(move || api.list_plans(skip, limit)).await?;
    Ok(Json(plans))
}

/// GET /plans/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ProductionPlan>> {
    let api = state.plan_api.clone();
    let plan = run_blocking(move || api.get_plan(id)).await?;
    Ok(Json(plan))
}

/// POST /plans
pub async fn create_plan(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<ProductionPlan>)> {
    let api = state.plan_api.clone();
    let plan = run_blocking(move || api.create_plan(req)).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /plans/{id}
pub async fn update_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdatePlanRequest>,
) -> ApiResult<Json<ProductionPlan>> {
    let api = state.plan_api.clone();
    let plan = run_blocking(move || api.update_plan(id, req)).await?;
    Ok(Json(plan))
}

/// DELETE /plans/{id}
pub async fn delete_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let api = state.plan_api.clone();
    run_blocking(move || api.delete_plan(id)).await?;
    Ok(Json(MessageResponse::new("Production plan deleted successfully")))
}

/// POST /plans/import?name&created_by&format
///
/// 请求体为文件原始字节
pub async fn import_plan(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ImportPlanQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ProductionPlan>)> {
    let api = state.plan_api.clone();
    let plan = run_blocking(move || {
        api.import_plan(&query.name, &query.created_by, &query.format, &body)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}
