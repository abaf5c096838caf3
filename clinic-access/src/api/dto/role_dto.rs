// clinic-access/src/api/dto/role_dto.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::role_model::Role;

// --- リクエストDTO ---

/// ロール定義（スナップショット入れ替え用）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleRequest {
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Role name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(range(min = 1, message = "Priority must be 1 or greater"))]
    pub priority: i32,

    #[serde(default)]
    pub is_clinic_required: bool,
}

impl RoleRequest {
    pub fn into_role(self) -> Role {
        Role {
            id: self.id,
            name: self.name.trim().to_string(),
            priority: self.priority,
            is_clinic_required: self.is_clinic_required,
        }
    }
}

/// ロール一覧の一括入れ替えリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceRolesRequest {
    #[validate(nested)]
    pub roles: Vec<RoleRequest>,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub priority: i32,
    pub is_clinic_required: bool,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            priority: role.priority,
            is_clinic_required: role.is_clinic_required,
        }
    }
}

/// ロール一覧レスポンス（優先度順）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleListResponse {
    pub roles: Vec<RoleResponse>,
    pub total_count: usize,
}

impl RoleListResponse {
    pub fn from_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        let roles: Vec<RoleResponse> = roles.into_iter().map(RoleResponse::from).collect();
        let total_count = roles.len();
        Self { roles, total_count }
    }
}
