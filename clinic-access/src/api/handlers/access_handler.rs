// clinic-access/src/api/handlers/access_handler.rs
use crate::api::dto::access_dto::*;
use crate::api::dto::role_dto::RoleResponse;
use crate::api::AppState;
use crate::domain::access_warning::{push_warning, AccessWarning};
use crate::domain::actor::AccessContext;
use crate::domain::scope::{EffectiveScope, ScopeSelection, ScopedQueryKey};
use crate::error::{AppError, AppResult};
use crate::service::screen_access_resolver::ScreenAccessResolver;
use crate::types::ApiResponse;
use crate::utils::permission::PermissionChecker;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// 画面アクセスを評価するクリニック
///
/// 指定がスコープ内ならそれを、無ければクリニック単位スコープの先頭を使う。
fn target_clinic(scope: &EffectiveScope, requested: Option<Uuid>) -> Option<Uuid> {
    match requested {
        Some(clinic_id) if scope.permits(scope.company_id(), Some(clinic_id)) => Some(clinic_id),
        _ => match scope {
            EffectiveScope::Clinics { clinic_ids, .. } => clinic_ids.first().copied(),
            _ => None,
        },
    }
}

fn clinic_selection(requested: Option<Uuid>) -> ScopeSelection {
    ScopeSelection {
        company_id: None,
        clinic_ids: requested.into_iter().collect(),
    }
}

/// ナビゲーションの表示項目
pub async fn navigation_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<NavigationRequest>,
) -> AppResult<ApiResponse<NavigationResponse>> {
    payload.validate()?;

    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);
    let resolution = app_state
        .scope_resolver
        .resolve(&ctx, &clinic_selection(payload.clinic_id))?;
    let clinic_id = target_clinic(&resolution.scope, payload.clinic_id);

    let screen_access = app_state.screen_access.read().await;
    let access = ScreenAccessResolver::new(&registry).resolve(
        clinic_id,
        &ctx.actor.role_ref(),
        PermissionChecker::is_privileged_override(&ctx),
        clinic_id.and_then(|id| screen_access.get(&id)).map(Vec::as_slice),
    );

    let outcome = app_state
        .navigation
        .filter(&ctx, &access, &payload.current_path);
    let mut warnings = outcome.warnings;
    for warning in resolution.warnings {
        push_warning(&mut warnings, warning);
    }

    info!(
        actor_id = %ctx.actor.id,
        role = ?ctx.role_name(),
        clinic_id = ?clinic_id,
        groups = outcome.groups.len(),
        "Navigation resolved"
    );

    Ok(ApiResponse::success(NavigationResponse {
        groups: outcome.groups,
        warnings,
    }))
}

/// ロール同士の管理可否
pub async fn can_manage_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CanManageRequest>,
) -> AppResult<ApiResponse<CanManageResponse>> {
    let registry = app_state.roles.read().await;
    let allowed =
        PermissionChecker::can_manage_role(&registry, &payload.actor_role, &payload.target_role);

    Ok(ApiResponse::success(CanManageResponse { allowed }))
}

/// ユーザー作成・編集フォームで選べるロール
pub async fn assignable_roles_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ActorRequest>,
) -> AppResult<ApiResponse<AssignableRolesResponse>> {
    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);
    if !ctx.is_role_known() {
        warn!(actor_id = %ctx.actor.id, role_id = %ctx.actor.role_id, "Unknown actor role");
    }

    let roles = registry
        .assignable_roles(&ctx.actor.role_ref())
        .into_iter()
        .map(RoleResponse::from)
        .collect();
    let can_create_user = PermissionChecker::can_create_user(&registry, &ctx);

    Ok(ApiResponse::success(AssignableRolesResponse {
        roles,
        can_create_user,
    }))
}

/// ユーザー一覧の絞り込みと行ごとの操作可否
pub async fn visible_users_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<VisibleUsersRequest>,
) -> AppResult<ApiResponse<VisibleUsersResponse>> {
    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);
    let resolution = app_state.scope_resolver.resolve(&ctx, &payload.selection)?;

    let users: Vec<VisibleUserResponse> =
        PermissionChecker::visible_users(&registry, &ctx, &payload.users)
            .into_iter()
            .filter(|user| resolution.scope.permits(user.company_id, user.clinic_id))
            .map(|user| VisibleUserResponse {
                id: user.id,
                role_id: user.role_id,
                actions: PermissionChecker::record_actions(&registry, &ctx, user.role_id, true),
            })
            .collect();

    info!(
        actor_id = %ctx.actor.id,
        requested = payload.users.len(),
        visible = users.len(),
        "Visible users resolved"
    );

    let total_count = users.len();
    Ok(ApiResponse::success(VisibleUsersResponse {
        users,
        total_count,
        warnings: resolution.warnings,
    }))
}

/// 単一画面のアクセス可否
pub async fn screen_check_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ScreenCheckRequest>,
) -> AppResult<ApiResponse<ScreenCheckResponse>> {
    payload.validate()?;

    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);
    let resolution = app_state
        .scope_resolver
        .resolve(&ctx, &clinic_selection(payload.clinic_id))?;
    let mut warnings = resolution.warnings;
    let privileged = PermissionChecker::is_privileged_override(&ctx);
    let clinic_id = target_clinic(&resolution.scope, payload.clinic_id);

    let screen_access = app_state.screen_access.read().await;
    let access = ScreenAccessResolver::new(&registry).resolve(
        clinic_id,
        &ctx.actor.role_ref(),
        privileged,
        clinic_id.and_then(|id| screen_access.get(&id)).map(Vec::as_slice),
    );
    if access.is_stale() && !privileged {
        push_warning(&mut warnings, AccessWarning::StaleAccessData);
    }

    let enabled = ctx.is_role_known() && access.is_screen_enabled(&payload.screen_name);

    Ok(ApiResponse::success(ScreenCheckResponse {
        screen_name: payload.screen_name,
        enabled,
        access,
        warnings,
    }))
}

/// 一覧クエリ用のスコープ。URLのクリニック指定はここで選択として反映する
pub async fn scope_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ScopeRequest>,
) -> AppResult<ApiResponse<ScopeResponse>> {
    let registry = app_state.roles.read().await;
    let ctx: AccessContext = registry.context_for(&payload.actor);

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    let resolution = app_state
        .scope_resolver
        .apply_selection(&ctx, &payload.selection, &mut invalidated)?;

    Ok(ApiResponse::success(ScopeResponse {
        resolution,
        invalidated,
    }))
}

/// Veterinarian のクリニック切り替え
pub async fn clinic_selection_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ClinicSelectionRequest>,
) -> AppResult<ApiResponse<ClinicSelectionResponse>> {
    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    let switch = app_state
        .scope_resolver
        .switch_clinic(&ctx, payload.clinic_id, &mut invalidated)
        .inspect_err(|e| {
            warn!(
                actor_id = %ctx.actor.id,
                clinic_id = %payload.clinic_id,
                "Clinic switch rejected: {}", e
            );
        })?;

    Ok(ApiResponse::success(ClinicSelectionResponse {
        switch,
        invalidated,
    }))
}

/// ユーザー作成・編集時のロールとクリニックの組み合わせを検証する
pub async fn validate_user_assignment_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<UserAssignmentRequest>,
) -> AppResult<ApiResponse<UserAssignmentResponse>> {
    let registry = app_state.roles.read().await;
    let ctx = registry.context_for(&payload.actor);
    let resolution = app_state.scope_resolver.resolve(&ctx, &payload.selection)?;

    PermissionChecker::validate_user_assignment(
        &registry,
        &ctx,
        &resolution.scope,
        &payload.target_role,
        &payload.clinic_ids,
    )?;

    let role_id = registry
        .resolve(&payload.target_role)
        .map(|role| role.id)
        .ok_or_else(|| AppError::UnknownRole(payload.target_role.to_string()))?;

    Ok(ApiResponse::success(UserAssignmentResponse {
        valid: true,
        role_id,
    }))
}

pub fn access_router(app_state: AppState) -> Router {
    Router::new()
        .route("/access/navigation", post(navigation_handler))
        .route("/access/can-manage", post(can_manage_handler))
        .route("/access/assignable-roles", post(assignable_roles_handler))
        .route("/access/visible-users", post(visible_users_handler))
        .route("/access/screens/check", post(screen_check_handler))
        .route("/access/scope", post(scope_handler))
        .route("/access/clinic-selection", post(clinic_selection_handler))
        .route(
            "/access/user-assignment/validate",
            post(validate_user_assignment_handler),
        )
        .with_state(app_state)
}
