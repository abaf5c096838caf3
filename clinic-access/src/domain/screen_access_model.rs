// clinic-access/src/domain/screen_access_model.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::role_model::RoleRef;

/// 外部のアクセス制御サービスから受け取る画面アクセス設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenAccessEntry {
    pub clinic_id: Uuid,
    #[serde(default)]
    pub role_id: Option<Uuid>,
    #[serde(default)]
    pub role_name: Option<String>,
    pub screen_name: String,
    pub is_access_enabled: bool,
}

impl ScreenAccessEntry {
    pub fn role_ref(&self) -> Option<RoleRef> {
        RoleRef::from_parts(self.role_id, self.role_name.as_deref())
    }
}

/// 画面名の比較用正規化
pub fn normalize_screen_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 解決済みの画面アクセス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "screens", rename_all = "snake_case")]
pub enum ScreenAccess {
    /// 特権ユーザー、またはクリニック未確定のため判定をバイパス
    Unrestricted,
    /// アクセス情報が空（未取得として全許可）
    NotLoaded,
    /// 有効な画面名（小文字）
    Restricted(BTreeSet<String>),
}

impl ScreenAccess {
    pub fn from_screens(screens: BTreeSet<String>) -> Self {
        if screens.is_empty() {
            Self::NotLoaded
        } else {
            Self::Restricted(screens)
        }
    }

    pub fn is_screen_enabled(&self, screen_name: &str) -> bool {
        match self {
            Self::Unrestricted | Self::NotLoaded => true,
            Self::Restricted(screens) => screens.contains(&normalize_screen_name(screen_name)),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::NotLoaded)
    }
}
