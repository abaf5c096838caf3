// clinic-access/src/api/handlers/role_handler.rs
use crate::api::dto::role_dto::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedUuid;
use crate::service::role_registry::RoleRegistry;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use tracing::{info, warn};
use validator::Validate;

/// ロール一覧取得（優先度順）
pub async fn list_roles_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<RoleListResponse>> {
    let registry = app_state.roles.read().await;
    let response = RoleListResponse::from_roles(registry.ordered());

    info!(roles_count = %response.total_count, "Roles list retrieved");
    Ok(ApiResponse::success(response))
}

/// 特定ロール取得
pub async fn get_role_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(role_id): ValidatedUuid,
) -> AppResult<ApiResponse<RoleResponse>> {
    let registry = app_state.roles.read().await;
    let role = registry.get(role_id).ok_or_else(|| {
        warn!(role_id = %role_id, "Role not found");
        AppError::NotFound(format!("Role with id {} not found", role_id))
    })?;

    Ok(ApiResponse::success(RoleResponse::from(role)))
}

/// ロールのスナップショットを丸ごと入れ替える
pub async fn replace_roles_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ReplaceRolesRequest>,
) -> AppResult<ApiResponse<RoleListResponse>> {
    payload.validate().map_err(|validation_errors| {
        warn!("Role snapshot validation failed: {}", validation_errors);
        AppError::ValidationFailure(validation_errors)
    })?;

    let roles = payload
        .roles
        .into_iter()
        .map(RoleRequest::into_role)
        .collect();
    let registry = RoleRegistry::from_roles(roles)?;
    let response = RoleListResponse::from_roles(registry.ordered());

    *app_state.roles.write().await = registry;

    info!(roles_count = %response.total_count, "Role snapshot replaced");
    Ok(ApiResponse::success(response))
}

pub fn role_router(app_state: AppState) -> Router {
    Router::new()
        .route("/roles", get(list_roles_handler).put(replace_roles_handler))
        .route("/roles/{role_id}", get(get_role_handler))
        .with_state(app_state)
}
