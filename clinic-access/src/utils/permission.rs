// clinic-access/src/utils/permission.rs

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::actor::AccessContext;
use crate::domain::role_model::{RoleName, RoleRef};
use crate::domain::scope::EffectiveScope;
use crate::error::{AppError, AppResult};
use crate::service::role_registry::RoleRegistry;

/// ロールを持つレコード（ユーザー一覧の行など）
pub trait RoleAssigned {
    fn role_id(&self) -> Uuid;
}

/// 行単位で表示すべき操作ボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordActions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl RecordActions {
    pub fn none() -> Self {
        Self {
            can_view: false,
            can_edit: false,
            can_delete: false,
        }
    }
}

/// 統合された権限チェック機能
pub struct PermissionChecker;

impl PermissionChecker {
    /// 操作側より厳密に弱いロールのみ管理できる。未知の優先度は常に拒否
    pub fn can_manage(actor_priority: Option<i32>, target_priority: Option<i32>) -> bool {
        match (actor_priority, target_priority) {
            (Some(actor), Some(target)) => target > actor,
            _ => false,
        }
    }

    /// ロール参照どうしの管理権限
    pub fn can_manage_role(registry: &RoleRegistry, actor: &RoleRef, target: &RoleRef) -> bool {
        let actor_priority = registry.resolve(actor).map(|r| r.priority);
        let target_priority = registry.resolve(target).map(|r| r.priority);
        let allowed = Self::can_manage(actor_priority, target_priority);

        debug!(
            actor_role = %actor,
            target_role = %target,
            actor_priority = ?actor_priority,
            target_priority = ?target_priority,
            allowed,
            "Evaluated role management permission"
        );

        allowed
    }

    /// 特権ユーザー（Super Admin）による判定のバイパス
    pub fn is_privileged_override(ctx: &AccessContext) -> bool {
        ctx.role_kind() == Some(RoleName::SuperAdmin)
    }

    /// ユーザー一覧で表示できる行（操作ユーザーより弱いロールのみ）
    pub fn visible_users<'a, T: RoleAssigned>(
        registry: &RoleRegistry,
        ctx: &AccessContext,
        users: &'a [T],
    ) -> Vec<&'a T> {
        let actor_priority = ctx.priority();
        users
            .iter()
            .filter(|user| {
                let target_priority = registry.get(user.role_id()).map(|r| r.priority);
                Self::can_manage(actor_priority, target_priority)
            })
            .collect()
    }

    /// 対象レコードに対する操作可否
    pub fn record_actions(
        registry: &RoleRegistry,
        ctx: &AccessContext,
        target_role_id: Uuid,
        in_scope: bool,
    ) -> RecordActions {
        if !in_scope {
            return RecordActions::none();
        }

        let target_priority = registry.get(target_role_id).map(|r| r.priority);
        let manageable = Self::can_manage(ctx.priority(), target_priority);

        RecordActions {
            can_view: manageable,
            can_edit: manageable,
            can_delete: manageable,
        }
    }

    /// 割り当て可能なロールが1つでもあればユーザーを作成できる
    pub fn can_create_user(registry: &RoleRegistry, ctx: &AccessContext) -> bool {
        !registry.assignable_roles(&ctx.actor.role_ref()).is_empty()
    }

    /// ユーザー作成・編集内容の検証
    pub fn validate_user_assignment(
        registry: &RoleRegistry,
        ctx: &AccessContext,
        scope: &EffectiveScope,
        target_role: &RoleRef,
        clinic_ids: &[Uuid],
    ) -> AppResult<()> {
        let target = registry
            .resolve(target_role)
            .ok_or_else(|| AppError::UnknownRole(target_role.to_string()))?;

        if !ctx.is_role_known() {
            return Err(AppError::UnknownRole(ctx.actor.role_id.to_string()));
        }

        if !Self::can_manage(ctx.priority(), Some(target.priority)) {
            return Err(AppError::Forbidden(format!(
                "Role '{}' cannot be assigned by this user",
                target.name
            )));
        }

        if target.is_clinic_required && clinic_ids.is_empty() {
            return Err(AppError::ValidationError(format!(
                "clinic_ids: Role '{}' requires at least one clinic",
                target.name
            )));
        }

        let clinic_bound = matches!(scope, EffectiveScope::Clinics { .. } | EffectiveScope::Empty);
        if clinic_bound {
            if let Some(outside) = clinic_ids
                .iter()
                .find(|id| !scope.clinic_ids().contains(id))
            {
                return Err(AppError::Forbidden(format!(
                    "Clinic {} is outside the current scope",
                    outside
                )));
            }
        }

        Ok(())
    }
}
