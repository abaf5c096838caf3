// clinic-access/src/api/mod.rs
use std::collections::HashMap;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::navigation::navigation_from_config;
use crate::config::AppConfig;
use crate::domain::screen_access_model::ScreenAccessEntry;
use crate::error::AppResult;
use crate::logging::{inject_request_context, logging_middleware};
use crate::service::navigation_filter::NavigationFilter;
use crate::service::role_registry::RoleRegistry;
use crate::service::scope_resolver::{InMemoryClinicSelectionStore, ScopeResolver};

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
///
/// ロールと画面アクセスは外部から受け取ったスナップショットを丸ごと差し替える。
#[derive(Clone)]
pub struct AppState {
    pub roles: Arc<RwLock<RoleRegistry>>,
    /// クリニックごとの画面アクセス設定。キーが無いクリニックは未取得
    pub screen_access: Arc<RwLock<HashMap<Uuid, Vec<ScreenAccessEntry>>>>,
    pub navigation: Arc<NavigationFilter>,
    pub scope_resolver: Arc<ScopeResolver<InMemoryClinicSelectionStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, navigation: NavigationFilter) -> Self {
        Self {
            roles: Arc::new(RwLock::new(RoleRegistry::empty())),
            screen_access: Arc::new(RwLock::new(HashMap::new())),
            navigation: Arc::new(navigation),
            scope_resolver: Arc::new(ScopeResolver::new(InMemoryClinicSelectionStore::new())),
            config: Arc::new(config),
        }
    }

    /// 設定からナビゲーションを読み込んで状態を作る
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let groups = navigation_from_config(config.navigation_config_path.as_deref())?;
        let navigation = NavigationFilter::new(groups)?;
        Ok(Self::new(config, navigation))
    }
}

/// 全ルーターを統合し、ログ用のレイヤーを重ねる
pub fn app_router(app_state: AppState) -> Router {
    Router::new()
        .merge(handlers::system_handler::system_router(app_state.clone()))
        .merge(handlers::role_handler::role_router(app_state.clone()))
        .merge(handlers::screen_access_handler::screen_access_router(
            app_state.clone(),
        ))
        .merge(handlers::access_handler::access_router(app_state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
}
