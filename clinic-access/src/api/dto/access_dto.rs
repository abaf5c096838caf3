// clinic-access/src/api/dto/access_dto.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::role_dto::RoleResponse;
use crate::domain::access_warning::AccessWarning;
use crate::domain::actor::Actor;
use crate::domain::navigation_model::VisibleNavigationGroup;
use crate::domain::role_model::RoleRef;
use crate::domain::scope::{ScopeSelection, ScopedQueryKey, ScopedRecord};
use crate::domain::screen_access_model::ScreenAccess;
use crate::service::scope_resolver::{ClinicSwitch, ScopeResolution};
use crate::utils::permission::{RecordActions, RoleAssigned};

fn default_path() -> String {
    "/".to_string()
}

// --- リクエストDTO ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NavigationRequest {
    pub actor: Actor,

    #[serde(default = "default_path")]
    #[validate(length(min = 1, max = 2048, message = "Path must be between 1 and 2048 characters"))]
    pub current_path: String,

    /// 未指定の場合はスコープから決まるクリニックを使う
    #[serde(default)]
    pub clinic_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanManageRequest {
    pub actor_role: RoleRef,
    pub target_role: RoleRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRequest {
    pub actor: Actor,
}

/// ユーザー一覧の1行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub role_id: Uuid,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub clinic_id: Option<Uuid>,
}

impl RoleAssigned for UserRow {
    fn role_id(&self) -> Uuid {
        self.role_id
    }
}

impl ScopedRecord for UserRow {
    fn company_id(&self) -> Option<Uuid> {
        self.company_id
    }

    fn clinic_id(&self) -> Option<Uuid> {
        self.clinic_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleUsersRequest {
    pub actor: Actor,
    #[serde(default)]
    pub selection: ScopeSelection,
    pub users: Vec<UserRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScreenCheckRequest {
    pub actor: Actor,
    #[serde(default)]
    pub clinic_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Screen name must be between 1 and 100 characters"))]
    pub screen_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRequest {
    pub actor: Actor,
    #[serde(default)]
    pub selection: ScopeSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicSelectionRequest {
    pub actor: Actor,
    pub clinic_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAssignmentRequest {
    pub actor: Actor,
    #[serde(default)]
    pub selection: ScopeSelection,
    pub target_role: RoleRef,
    #[serde(default)]
    pub clinic_ids: Vec<Uuid>,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub groups: Vec<VisibleNavigationGroup>,
    pub warnings: Vec<AccessWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanManageResponse {
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignableRolesResponse {
    pub roles: Vec<RoleResponse>,
    pub can_create_user: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleUserResponse {
    pub id: Uuid,
    pub role_id: Uuid,
    pub actions: RecordActions,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleUsersResponse {
    pub users: Vec<VisibleUserResponse>,
    pub total_count: usize,
    pub warnings: Vec<AccessWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenCheckResponse {
    pub screen_name: String,
    pub enabled: bool,
    pub access: ScreenAccess,
    pub warnings: Vec<AccessWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAssignmentResponse {
    pub valid: bool,
    pub role_id: Uuid,
}

/// URLの選択を反映したスコープ。切り替えが起きた場合は無効化したキーも返す
#[derive(Debug, Clone, Serialize)]
pub struct ScopeResponse {
    #[serde(flatten)]
    pub resolution: ScopeResolution,
    pub invalidated: Vec<ScopedQueryKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicSelectionResponse {
    #[serde(flatten)]
    pub switch: ClinicSwitch,
    /// 旧クリニックのキャッシュキー（無効化した順）
    pub invalidated: Vec<ScopedQueryKey>,
}
