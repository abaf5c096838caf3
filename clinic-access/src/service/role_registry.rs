// clinic-access/src/service/role_registry.rs
use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use crate::domain::actor::{AccessContext, Actor};
use crate::domain::role_model::{Role, RoleRef};
use crate::error::{AppError, AppResult};
use crate::utils::permission::PermissionChecker;

/// ロール定義のスナップショット
///
/// 差分更新は行わず、ロール一覧が変わるたびに作り直す。
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: Vec<Role>,
    index: HashMap<Uuid, usize>,
}

impl RoleRegistry {
    /// ロール一覧からレジストリを構築（優先度順に並べ替える）
    pub fn from_roles(mut roles: Vec<Role>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for role in &roles {
            if role.name.trim().is_empty() {
                return Err(AppError::ValidationError(format!(
                    "Role {} has an empty name",
                    role.id
                )));
            }
            if !seen.insert(role.id) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate role id: {}",
                    role.id
                )));
            }
        }

        roles.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let index = roles
            .iter()
            .enumerate()
            .map(|(position, role)| (role.id, position))
            .collect();

        debug!(role_count = roles.len(), "Role registry rebuilt");

        Ok(Self { roles, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// 優先度順のロール一覧
    pub fn ordered(&self) -> &[Role] {
        &self.roles
    }

    pub fn get(&self, role_id: Uuid) -> Option<&Role> {
        self.index.get(&role_id).map(|&position| &self.roles[position])
    }

    /// 名前で検索（大文字小文字を区別しない）
    pub fn find_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.has_name(name))
    }

    /// ロール参照の解決
    pub fn resolve(&self, role: &RoleRef) -> Option<&Role> {
        match role {
            RoleRef::ById(id) => self.get(*id),
            RoleRef::ByName(name) => self.find_by_name(name),
        }
    }

    /// ロール参照の名前。名前参照はスナップショットに無くてもそのまま返す
    pub fn name_of<'a>(&'a self, role: &'a RoleRef) -> Option<&'a str> {
        match role {
            RoleRef::ById(id) => self.get(*id).map(|r| r.name.as_str()),
            RoleRef::ByName(name) => Some(name.as_str()),
        }
    }

    pub fn priority_of(&self, role_id: Uuid) -> AppResult<i32> {
        self.get(role_id)
            .map(|role| role.priority)
            .ok_or_else(|| AppError::UnknownRole(role_id.to_string()))
    }

    pub fn is_clinic_required(&self, role_id: Uuid) -> AppResult<bool> {
        self.get(role_id)
            .map(|role| role.is_clinic_required)
            .ok_or_else(|| AppError::UnknownRole(role_id.to_string()))
    }

    /// 操作ユーザーのコンテキストを作る
    pub fn context_for(&self, actor: &Actor) -> AccessContext {
        AccessContext::new(actor.clone(), self.get(actor.role_id).cloned())
    }

    /// ユーザー作成・編集時に割り当て可能なロール（優先度順）
    pub fn assignable_roles(&self, actor_role: &RoleRef) -> Vec<&Role> {
        let actor_priority = self.resolve(actor_role).map(|r| r.priority);
        self.roles
            .iter()
            .filter(|role| PermissionChecker::can_manage(actor_priority, Some(role.priority)))
            .collect()
    }
}
