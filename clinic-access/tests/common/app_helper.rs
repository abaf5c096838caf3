// tests/common/app_helper.rs

use axum::Router;
use clinic_access::{
    api::{app_router, AppState},
    config::{navigation::default_navigation, AppConfig},
    domain::role_model::Role,
    service::{navigation_filter::NavigationFilter, role_registry::RoleRegistry},
};

use crate::common;

/// 組み込みナビゲーションと標準ロールを持つアプリ状態
pub async fn setup_state() -> (AppState, Vec<Role>) {
    common::init_test_env();

    let navigation = NavigationFilter::new(default_navigation()).unwrap();
    let app_state = AppState::new(AppConfig::for_testing(), navigation);

    let roles = common::test_data::standard_roles();
    *app_state.roles.write().await = RoleRegistry::from_roles(roles.clone()).unwrap();

    (app_state, roles)
}

/// テスト用ルーターのセットアップ
pub async fn setup_app() -> (Router, AppState, Vec<Role>) {
    let (app_state, roles) = setup_state().await;
    let app = app_router(app_state.clone());
    (app, app_state, roles)
}

pub fn role_named<'a>(roles: &'a [Role], name: &str) -> &'a Role {
    roles.iter().find(|role| role.name == name).unwrap()
}
