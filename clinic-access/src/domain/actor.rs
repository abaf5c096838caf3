// clinic-access/src/domain/actor.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role_model::{Role, RoleName, RoleRef};

/// 認証済みの操作ユーザー（セッション単位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role_id: Uuid,
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub clinic_ids: Vec<Uuid>,
}

impl Actor {
    pub fn is_assigned_to(&self, clinic_id: Uuid) -> bool {
        self.clinic_ids.contains(&clinic_id)
    }

    pub fn role_ref(&self) -> RoleRef {
        RoleRef::ById(self.role_id)
    }
}

/// 判定に渡す明示的なコンテキスト
///
/// `role` は現在のロールスナップショットで解決できた場合のみ `Some`。
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub actor: Actor,
    pub role: Option<Role>,
}

impl AccessContext {
    pub fn new(actor: Actor, role: Option<Role>) -> Self {
        Self { actor, role }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|r| r.name.as_str())
    }

    pub fn role_kind(&self) -> Option<RoleName> {
        self.role.as_ref().and_then(Role::kind)
    }

    pub fn priority(&self) -> Option<i32> {
        self.role.as_ref().map(|r| r.priority)
    }

    pub fn is_role_known(&self) -> bool {
        self.role.is_some()
    }
}
