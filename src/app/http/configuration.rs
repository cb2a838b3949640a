// ==========================================
// 排产配置相关处理器
// ==========================================

use axum::{extract::State, http::StatusCode, Json};

use crate::api::dto::{
    CreateConfigurationRequest, ListQuery, MessageResponse, UpdateConfigurationRequest,
};
use crate::api::error::ApiResult;
use crate::app::http::common::{run_blocking, ApiJson, ApiPath, ApiQuery};
use crate::app::state::AppState;
use crate::domain::configuration::Configuration;

/// GET /configurations
pub async fn list_configurations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Vec<Configuration>>> {
    let (skip, limit) = state.page_limits.resolve(query.skip, query.limit);
    let api = state.configuration_api.clone();
    let configs = run_blocking(move || api.list_configurations(skip, limit)).await?;
    Ok(Json(configs))
}

/// GET /configurations/{id}
pub async fn get_configuration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Configuration>> {
    let api = state.configuration_api.clone();
    let config = run_blocking(move || api.get_configuration(id)).await?;
    Ok(Json(config))
}

/// POST /configurations
pub async fn create_configuration(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateConfigurationRequest>,
) -> ApiResult<(StatusCode, Json<Configuration>)> {
    let api = state.configuration_api.clone();
    let config = run_blocking(move || api.create_configuration(req)).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

/// PUT /configurations/{id}
pub async fn update_configuration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateConfigurationRequest>,
) -> ApiResult<Json<Configuration>> {
    let api = state.configuration_api.clone();
    let config = run_blocking(move || api.update_configuration(id, req)).await?;
    Ok(Json(config))
}

/// DELETE /configurations/{id}
pub async fn delete_configuration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let api = state.configuration_api.clone();
    run_blocking(move || api.delete_configuration(id)).await?;
    Ok(Json(MessageResponse::new("Configuration deleted successfully")))
}
