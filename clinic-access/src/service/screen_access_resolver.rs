// clinic-access/src/service/screen_access_resolver.rs
use std::collections::BTreeSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::role_model::{names_match, RoleRef};
use crate::domain::screen_access_model::{normalize_screen_name, ScreenAccess, ScreenAccessEntry};
use crate::service::role_registry::RoleRegistry;

/// クリニックとロールから有効な画面を解決する
pub struct ScreenAccessResolver<'a> {
    registry: &'a RoleRegistry,
}

impl<'a> ScreenAccessResolver<'a> {
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self { registry }
    }

    /// `entries` が `None` の場合はまだ取得していないものとして扱う
    pub fn resolve(
        &self,
        clinic_id: Option<Uuid>,
        role: &RoleRef,
        privileged: bool,
        entries: Option<&[ScreenAccessEntry]>,
    ) -> ScreenAccess {
        let Some(clinic_id) = clinic_id else {
            debug!(role = %role, "No clinic selected, screen access bypassed");
            return ScreenAccess::Unrestricted;
        };
        if privileged {
            return ScreenAccess::Unrestricted;
        }

        let screens: BTreeSet<String> = entries
            .unwrap_or_default()
            .iter()
            .filter(|entry| entry.clinic_id == clinic_id && entry.is_access_enabled)
            .filter(|entry| self.role_matches(role, entry))
            .map(|entry| normalize_screen_name(&entry.screen_name))
            .collect();

        let access = ScreenAccess::from_screens(screens);
        if access.is_stale() {
            warn!(
                clinic_id = %clinic_id,
                role = %role,
                "No screen access data for clinic, allowing all screens"
            );
        }
        access
    }

    /// ID が双方にあれば ID で、そうでなければ名前で比較する
    fn role_matches(&self, role: &RoleRef, entry: &ScreenAccessEntry) -> bool {
        if let (RoleRef::ById(id), Some(entry_role_id)) = (role, entry.role_id) {
            return *id == entry_role_id;
        }

        let entry_name = entry.role_name.as_deref().or_else(|| {
            entry
                .role_id
                .and_then(|id| self.registry.get(id))
                .map(|r| r.name.as_str())
        });

        match (self.registry.name_of(role), entry_name) {
            (Some(actor_name), Some(entry_name)) => names_match(actor_name, entry_name),
            _ => false,
        }
    }
}
