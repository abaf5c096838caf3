// clinic-access/src/api/handlers/screen_access_handler.rs
use crate::api::dto::screen_access_dto::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedUuid;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use tracing::{info, warn};
use validator::Validate;

/// クリニックの画面アクセス設定を取得する。未登録なら404
pub async fn get_screen_access_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(clinic_id): ValidatedUuid,
) -> AppResult<ApiResponse<ScreenAccessListResponse>> {
    let store = app_state.screen_access.read().await;
    let entries = store.get(&clinic_id).cloned().ok_or_else(|| {
        AppError::NotFound(format!(
            "Screen access for clinic {} has not been loaded",
            clinic_id
        ))
    })?;

    let total_count = entries.len();
    Ok(ApiResponse::success(ScreenAccessListResponse {
        clinic_id,
        entries,
        total_count,
    }))
}

/// クリニックの画面アクセス設定を入れ替える
pub async fn replace_screen_access_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(clinic_id): ValidatedUuid,
    Json(payload): Json<ReplaceScreenAccessRequest>,
) -> AppResult<ApiResponse<ScreenAccessListResponse>> {
    payload.validate().map_err(|validation_errors| {
        warn!(clinic_id = %clinic_id, "Screen access validation failed: {}", validation_errors);
        AppError::ValidationFailure(validation_errors)
    })?;

    let entries: Vec<_> = payload
        .entries
        .into_iter()
        .map(|entry| entry.into_entry(clinic_id))
        .collect();

    if let Some(index) = entries.iter().position(|entry| entry.role_ref().is_none()) {
        return Err(AppError::ValidationError(format!(
            "entries[{}]: role_id or role_name is required",
            index
        )));
    }

    let total_count = entries.len();

    app_state
        .screen_access
        .write()
        .await
        .insert(clinic_id, entries.clone());

    info!(
        clinic_id = %clinic_id,
        entries_count = %total_count,
        "Screen access replaced"
    );

    Ok(ApiResponse::success(ScreenAccessListResponse {
        clinic_id,
        entries,
        total_count,
    }))
}

/// 設定を破棄し未取得の状態に戻す
pub async fn clear_screen_access_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(clinic_id): ValidatedUuid,
) -> AppResult<ApiResponse<ScreenAccessListResponse>> {
    let removed = app_state
        .screen_access
        .write()
        .await
        .remove(&clinic_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Screen access for clinic {} has not been loaded",
                clinic_id
            ))
        })?;

    info!(clinic_id = %clinic_id, "Screen access cleared");

    let total_count = removed.len();
    Ok(ApiResponse::success(ScreenAccessListResponse {
        clinic_id,
        entries: removed,
        total_count,
    }))
}

pub fn screen_access_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/clinics/{clinic_id}/screen-access",
            get(get_screen_access_handler)
                .put(replace_screen_access_handler)
                .delete(clear_screen_access_handler),
        )
        .with_state(app_state)
}
