// clinic-access/src/domain/role_model.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ロール定義
///
/// `priority` は小さいほど強い権限を表す（1 が最上位）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub priority: i32,
    pub is_clinic_required: bool,
}

impl Role {
    pub fn new(name: &str, priority: i32, is_clinic_required: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            priority,
            is_clinic_required,
        }
    }

    /// 既知のロール名として解釈
    pub fn kind(&self) -> Option<RoleName> {
        RoleName::from_str(&self.name)
    }

    /// 名前が一致するか（大文字小文字を区別しない）
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// システムが意味を持たせているロール名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    SuperAdmin,
    Administrator,
    ClinicAdmin,
    Veterinarian,
    Receptionist,
}

impl RoleName {
    pub const ALL: [RoleName; 5] = [
        RoleName::SuperAdmin,
        RoleName::Administrator,
        RoleName::ClinicAdmin,
        RoleName::Veterinarian,
        RoleName::Receptionist,
    ];

    /// 表示用のロール名
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "Super Admin",
            RoleName::Administrator => "Administrator",
            RoleName::ClinicAdmin => "Clinic Admin",
            RoleName::Veterinarian => "Veterinarian",
            RoleName::Receptionist => "Receptionist",
        }
    }

    /// 文字列からロール名を解析（空白・区切り文字・大文字小文字を無視）
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "superadmin" => Some(RoleName::SuperAdmin),
            "administrator" => Some(RoleName::Administrator),
            "clinicadmin" => Some(RoleName::ClinicAdmin),
            "veterinarian" => Some(RoleName::Veterinarian),
            "receptionist" => Some(RoleName::Receptionist),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid role name: {}", s))
    }
}

/// ロール参照。IDが無い場合のみ名前で参照する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRef {
    ById(Uuid),
    ByName(String),
}

impl RoleRef {
    /// IDがあればID参照、無ければ名前参照を作る
    pub fn from_parts(id: Option<Uuid>, name: Option<&str>) -> Option<Self> {
        match (id, name) {
            (Some(id), _) => Some(RoleRef::ById(id)),
            (None, Some(name)) if !name.trim().is_empty() => {
                Some(RoleRef::ByName(name.trim().to_string()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleRef::ById(id) => write!(f, "{}", id),
            RoleRef::ByName(name) => write!(f, "{}", name),
        }
    }
}

/// ロール名の比較（前後の空白と大文字小文字を無視）
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
