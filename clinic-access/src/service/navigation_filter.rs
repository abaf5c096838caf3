// clinic-access/src/service/navigation_filter.rs
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::domain::access_warning::{push_warning, AccessWarning};
use crate::domain::actor::AccessContext;
use crate::domain::navigation_model::{
    NavigationGroup, NavigationItem, VisibleNavigationGroup, VisibleNavigationItem,
};
use crate::domain::screen_access_model::ScreenAccess;
use crate::error::{AppError, AppResult};
use crate::utils::path_pattern::{compile_dynamic_pattern, is_same_or_nested};
use crate::utils::permission::PermissionChecker;

struct CompiledItem {
    item: NavigationItem,
    patterns: Vec<Regex>,
}

impl CompiledItem {
    /// 最初に一致した規則で判定する
    fn is_active(&self, path: &str) -> bool {
        is_same_or_nested(path, &self.item.href)
            || self
                .item
                .active_paths
                .iter()
                .any(|active| is_same_or_nested(path, active))
            || self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

struct CompiledGroup {
    label: String,
    allowed_role_names: Vec<String>,
    items: Vec<CompiledItem>,
}

/// フィルタ結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationOutcome {
    pub groups: Vec<VisibleNavigationGroup>,
    pub warnings: Vec<AccessWarning>,
}

/// 操作ユーザーに表示するナビゲーションを組み立てる
///
/// 設定順をそのまま表示順とし、並べ替えは行わない。
pub struct NavigationFilter {
    groups: Vec<CompiledGroup>,
}

impl NavigationFilter {
    /// 設定を検証し、動的パスパターンを一度だけコンパイルする
    pub fn new(groups: Vec<NavigationGroup>) -> AppResult<Self> {
        let mut compiled = Vec::with_capacity(groups.len());

        for group in groups {
            if group.label.trim().is_empty() {
                return Err(AppError::Configuration(
                    "Navigation group label must not be empty".to_string(),
                ));
            }

            let mut items = Vec::with_capacity(group.items.len());
            for item in group.items {
                if item.href.trim().is_empty() || item.label.trim().is_empty() {
                    return Err(AppError::Configuration(format!(
                        "Navigation item in group '{}' needs both href and label",
                        group.label
                    )));
                }
                let patterns = item
                    .dynamic_path_patterns
                    .iter()
                    .map(|pattern| compile_dynamic_pattern(pattern))
                    .collect::<AppResult<Vec<_>>>()?;
                items.push(CompiledItem { item, patterns });
            }

            compiled.push(CompiledGroup {
                label: group.label,
                allowed_role_names: group.allowed_role_names,
                items,
            });
        }

        Ok(Self { groups: compiled })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn filter(
        &self,
        ctx: &AccessContext,
        access: &ScreenAccess,
        current_path: &str,
    ) -> NavigationOutcome {
        let mut warnings = Vec::new();

        let Some(role_name) = ctx.role_name() else {
            push_warning(&mut warnings, AccessWarning::UnknownRole);
            debug!(
                actor_id = %ctx.actor.id,
                role_id = %ctx.actor.role_id,
                "Unknown role, no navigation visible"
            );
            return NavigationOutcome {
                groups: Vec::new(),
                warnings,
            };
        };

        let privileged = PermissionChecker::is_privileged_override(ctx);
        if !privileged && access.is_stale() {
            push_warning(&mut warnings, AccessWarning::StaleAccessData);
        }

        let groups = self
            .groups
            .iter()
            .filter(|group| group.allowed_role_names.iter().any(|name| name == role_name))
            .filter_map(|group| {
                let items: Vec<VisibleNavigationItem> = group
                    .items
                    .iter()
                    .filter(|compiled| compiled.item.allows(role_name))
                    .filter_map(|compiled| {
                        let label = compiled.item.display_label(role_name);
                        if !privileged && !access.is_screen_enabled(label) {
                            return None;
                        }
                        Some(VisibleNavigationItem {
                            href: compiled.item.href.clone(),
                            label: label.to_string(),
                            is_active: compiled.is_active(current_path),
                        })
                    })
                    .collect();

                (!items.is_empty()).then(|| VisibleNavigationGroup {
                    label: group.label.clone(),
                    items,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            actor_id = %ctx.actor.id,
            role = %role_name,
            privileged,
            visible_groups = groups.len(),
            "Navigation filtered"
        );

        NavigationOutcome { groups, warnings }
    }
}
