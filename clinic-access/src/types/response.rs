// clinic-access/src/types/response.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logging::current_request_id;

/// 成功レスポンスの共通エンベロープ。失敗側は `ErrorResponse`
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResponseMeta {
    /// ミドルウェア配下では `x-request-id` と一致する
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub fn for_current_request() -> Self {
        Self {
            request_id: current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: Utc::now(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::for_current_request(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
