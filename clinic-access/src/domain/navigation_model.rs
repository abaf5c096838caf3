// clinic-access/src/domain/navigation_model.rs
use serde::{Deserialize, Serialize};

/// サイドバーのグループ定義（静的設定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationGroup {
    pub label: String,
    pub allowed_role_names: Vec<String>,
    pub items: Vec<NavigationItem>,
}

/// サイドバーの項目定義（静的設定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub href: String,
    pub label: String,
    pub allowed_role_names: Vec<String>,
    #[serde(default)]
    pub active_paths: Vec<String>,
    #[serde(default)]
    pub dynamic_path_patterns: Vec<String>,
    #[serde(default)]
    pub label_overrides: Vec<LabelOverride>,
}

/// 特定ロールに対する表示名の差し替え
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOverride {
    pub role_names: Vec<String>,
    pub label: String,
}

impl NavigationItem {
    pub fn new(href: &str, label: &str, allowed_role_names: &[&str]) -> Self {
        Self {
            href: href.to_string(),
            label: label.to_string(),
            allowed_role_names: allowed_role_names.iter().map(|s| (*s).to_string()).collect(),
            active_paths: Vec::new(),
            dynamic_path_patterns: Vec::new(),
            label_overrides: Vec::new(),
        }
    }

    pub fn with_active_paths(mut self, paths: &[&str]) -> Self {
        self.active_paths = paths.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn with_dynamic_patterns(mut self, patterns: &[&str]) -> Self {
        self.dynamic_path_patterns = patterns.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn with_label_override(mut self, role_names: &[&str], label: &str) -> Self {
        self.label_overrides.push(LabelOverride {
            role_names: role_names.iter().map(|s| (*s).to_string()).collect(),
            label: label.to_string(),
        });
        self
    }

    pub fn allows(&self, role_name: &str) -> bool {
        self.allowed_role_names.iter().any(|name| name == role_name)
    }

    /// ロールに応じた表示名（最初に一致した差し替えを採用）
    pub fn display_label(&self, role_name: &str) -> &str {
        self.label_overrides
            .iter()
            .find(|o| o.role_names.iter().any(|name| name == role_name))
            .map_or(self.label.as_str(), |o| o.label.as_str())
    }
}

/// フィルタ後のグループ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleNavigationGroup {
    pub label: String,
    pub items: Vec<VisibleNavigationItem>,
}

/// フィルタ後の項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleNavigationItem {
    pub href: String,
    pub label: String,
    pub is_active: bool,
}
