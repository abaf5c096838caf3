// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

use crate::logging::current_request_id;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// レスポンスに載せるエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::UnknownRole(_) => "unknown_role",
            AppError::ValidationError(_) => "validation_error",
            AppError::ValidationFailure(_) => "validation_errors",
            AppError::BadRequest(_) => "bad_request",
            AppError::Forbidden(_) => "forbidden",
            AppError::Configuration(_) => "configuration_error",
            AppError::InternalServerError(_) => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::UnknownRole(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_)
            | AppError::ValidationFailure(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let body = match self {
            AppError::UnknownRole(role) => ErrorResponse::new(
                format!("Role '{}' is not present in the current role set", role),
                error_type,
            )
            .with_details(json!({ "role": role })),
            AppError::ValidationFailure(errors) => {
                ErrorResponse::new("Validation failed", error_type)
                    .with_validation_errors(field_messages(&errors))
            }
            AppError::Configuration(message) | AppError::InternalServerError(message) => {
                // 詳細はサーバーログにだけ残す
                tracing::error!(error = %message, error_type, "Internal error");
                ErrorResponse::new("An internal server error occurred", error_type)
            }
            AppError::NotFound(message)
            | AppError::ValidationError(message)
            | AppError::BadRequest(message)
            | AppError::Forbidden(message) => ErrorResponse::new(message, error_type),
        };

        (status, Json(body)).into_response()
    }
}

fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
///
/// `request_id` は `x-request-id` ヘッダーと同じ値になる。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: &str) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            error_type: error_type.to_string(),
            request_id: current_request_id(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_validation_errors(mut self, errors: HashMap<String, Vec<String>>) -> Self {
        self.validation_errors = Some(errors);
        self
    }
}
