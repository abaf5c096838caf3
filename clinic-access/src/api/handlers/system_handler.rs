use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub is_test: bool,
    pub is_production: bool,
    pub is_development: bool,
    pub role_count: usize,
    pub clinics_with_screen_access: usize,
    pub navigation_groups: usize,
}

/// 稼働確認。現在保持しているスナップショットの件数も返す
pub async fn health_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<HealthResponse>> {
    let role_count = app_state.roles.read().await.len();
    let clinics_with_screen_access = app_state.screen_access.read().await.len();

    Ok(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: app_state.config.environment.clone(),
        is_test: app_state.config.is_test(),
        is_production: app_state.config.is_production(),
        is_development: app_state.config.is_development(),
        role_count,
        clinics_with_screen_access,
        navigation_groups: app_state.navigation.group_count(),
    }))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
