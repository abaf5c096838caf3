// clinic-access/src/api/dto/screen_access_dto.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::screen_access_model::ScreenAccessEntry;

/// クリニック単位の画面アクセス設定（clinic_id はパスから補う）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScreenAccessEntryRequest {
    #[serde(default)]
    pub role_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Role name must be between 1 and 100 characters"))]
    pub role_name: Option<String>,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Screen name must be between 1 and 100 characters"
    ))]
    pub screen_name: String,

    pub is_access_enabled: bool,
}

impl ScreenAccessEntryRequest {
    pub fn into_entry(self, clinic_id: Uuid) -> ScreenAccessEntry {
        ScreenAccessEntry {
            clinic_id,
            role_id: self.role_id,
            role_name: self.role_name,
            screen_name: self.screen_name,
            is_access_enabled: self.is_access_enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceScreenAccessRequest {
    #[validate(nested)]
    pub entries: Vec<ScreenAccessEntryRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenAccessListResponse {
    pub clinic_id: Uuid,
    pub entries: Vec<ScreenAccessEntry>,
    pub total_count: usize,
}
