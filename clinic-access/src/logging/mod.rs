// clinic-access/src/logging/mod.rs

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Level;
use uuid::Uuid;

/// 呼び出し側とやり取りするリクエストIDのヘッダー
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

tokio::task_local! {
    static CURRENT_REQUEST_ID: String;
}

/// キー付きフィールドを Debug 形式で添えてレベル別に出力する
#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:expr => $value:expr),* $(,)?)?) => {{
        let level: tracing::Level = $level;
        if level == tracing::Level::ERROR {
            tracing::error!(message = $msg $(, $($key = ?$value,)*)?);
        } else if level == tracing::Level::WARN {
            tracing::warn!(message = $msg $(, $($key = ?$value,)*)?);
        } else if level == tracing::Level::INFO {
            tracing::info!(message = $msg $(, $($key = ?$value,)*)?);
        } else if level == tracing::Level::DEBUG {
            tracing::debug!(message = $msg $(, $($key = ?$value,)*)?);
        } else {
            tracing::trace!(message = $msg $(, $($key = ?$value,)*)?);
        }
    }};
}

/// リクエスト単位のログ文脈
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub method: String,
    /// `/clinics/{id}/...` 配下のリクエストなら対象クリニック
    pub clinic_id: Option<Uuid>,
}

impl RequestContext {
    fn from_request(req: &Request<Body>) -> Self {
        let path = req.uri().path().to_string();
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(accepted_request_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            clinic_id: clinic_id_in_path(&path),
            method: req.method().to_string(),
            path,
        }
    }
}

/// 実行中のリクエストのID。ミドルウェアの外では None
pub fn current_request_id() -> Option<String> {
    CURRENT_REQUEST_ID.try_with(Clone::clone).ok()
}

/// ステータスに応じた完了ログのレベル
pub fn level_for_status(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

// 呼び出し側のIDは可視ASCIIかつ長さ上限内のときだけ引き継ぐ
fn accepted_request_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let acceptable = !trimmed.is_empty()
        && trimmed.len() <= MAX_REQUEST_ID_LEN
        && trimmed.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| trimmed.to_string())
}

fn clinic_id_in_path(path: &str) -> Option<Uuid> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    while let Some(segment) = segments.next() {
        if segment == "clinics" {
            return segments.next().and_then(|id| Uuid::parse_str(id).ok());
        }
    }
    None
}

/// 開始と完了を記録する。文脈が無いリクエストは素通し
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let Some(context) = req.extensions().get::<RequestContext>().cloned() else {
        return next.run(req).await;
    };

    log_with_context!(
        Level::DEBUG,
        "Request started",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "clinic_id" => context.clinic_id,
    );

    let started_at = Instant::now();
    let response = next.run(req).await;
    let status = response.status();

    log_with_context!(
        level_for_status(status),
        "Request completed",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "clinic_id" => context.clinic_id,
        "status" => status.as_u16(),
        "duration_ms" => started_at.elapsed().as_millis(),
    );

    response
}

/// RequestContext を拡張に積み、応答にも同じリクエストIDを付ける
///
/// ハンドラーの実行中は `current_request_id` から同じIDを参照できる。
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let context = RequestContext::from_request(&req);
    let request_id = context.request_id.clone();
    req.extensions_mut().insert(context);

    let mut response = CURRENT_REQUEST_ID
        .scope(request_id.clone(), next.run(req))
        .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
