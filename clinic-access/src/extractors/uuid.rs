use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// URLパスからUUIDパラメータ名を推測するヘルパー関数
fn param_name_for(path: &str) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.first() {
        Some(&"roles") => "role_id",
        Some(&"clinics") => "clinic_id",
        _ => "id",
    }
}

/// パスパラメータからUUIDを抽出し、検証を行う
#[derive(Debug, Clone, Copy)]
pub struct ValidatedUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidatedUuid
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let param_name = param_name_for(parts.uri.path());
                AppError::BadRequest(format!("Missing path parameter '{}': {}", param_name, e))
            })?;

        let uuid = Uuid::parse_str(&raw).map_err(|_| {
            let param_name = param_name_for(parts.uri.path());
            AppError::BadRequest(format!(
                "Invalid UUID format for '{}': '{}'",
                param_name, raw
            ))
        })?;

        Ok(ValidatedUuid(uuid))
    }
}
