// src/config/navigation.rs
use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::navigation_model::{NavigationGroup, NavigationItem};
use crate::error::{AppError, AppResult};

const SUPER_ADMIN: &str = "Super Admin";
const ADMINISTRATOR: &str = "Administrator";
const CLINIC_ADMIN: &str = "Clinic Admin";
const VETERINARIAN: &str = "Veterinarian";
const RECEPTIONIST: &str = "Receptionist";

const ALL_ROLES: &[&str] = &[
    SUPER_ADMIN,
    ADMINISTRATOR,
    CLINIC_ADMIN,
    VETERINARIAN,
    RECEPTIONIST,
];

fn group(label: &str, allowed_role_names: &[&str], items: Vec<NavigationItem>) -> NavigationGroup {
    NavigationGroup {
        label: label.to_string(),
        allowed_role_names: allowed_role_names.iter().map(|s| (*s).to_string()).collect(),
        items,
    }
}

/// 組み込みのサイドバー定義
pub fn default_navigation() -> Vec<NavigationGroup> {
    vec![
        group(
            "Overview",
            ALL_ROLES,
            vec![NavigationItem::new("/dashboard", "Dashboard", ALL_ROLES)],
        ),
        group(
            "Administration",
            &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN],
            vec![
                NavigationItem::new("/companies", "Companies", &[SUPER_ADMIN])
                    .with_dynamic_patterns(&["/company/[id]/details"]),
                NavigationItem::new("/clinics", "Clinics", &[SUPER_ADMIN, ADMINISTRATOR])
                    .with_dynamic_patterns(&["/clinic/[id]/details"]),
                NavigationItem::new(
                    "/users",
                    "Users",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN],
                )
                .with_label_override(&[SUPER_ADMIN], "Admins")
                .with_dynamic_patterns(&["/user/[id]/edit"]),
                NavigationItem::new("/roles", "Roles", &[SUPER_ADMIN]),
            ],
        ),
        group(
            "Clinic",
            ALL_ROLES,
            vec![
                NavigationItem::new("/appointments", "Appointments", ALL_ROLES)
                    .with_active_paths(&["/calendar"]),
                NavigationItem::new(
                    "/inventory",
                    "Inventory",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN, VETERINARIAN],
                ),
                NavigationItem::new(
                    "/purchase-orders",
                    "Purchase Orders",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN],
                )
                .with_dynamic_patterns(&["/purchase-order/[id]"]),
                NavigationItem::new(
                    "/suppliers",
                    "Suppliers",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN],
                ),
                NavigationItem::new(
                    "/products",
                    "Products",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN, VETERINARIAN],
                ),
                NavigationItem::new(
                    "/rooms",
                    "Rooms",
                    &[SUPER_ADMIN, ADMINISTRATOR, CLINIC_ADMIN],
                )
                .with_dynamic_patterns(&["/clinic/[id]/rooms"]),
                NavigationItem::new(
                    "/certificates",
                    "Certificates",
                    &[CLINIC_ADMIN, VETERINARIAN],
                )
                .with_dynamic_patterns(&["/certificate/[id]/preview"]),
            ],
        ),
        group(
            "Settings",
            ALL_ROLES,
            vec![NavigationItem::new("/profile", "Profile", ALL_ROLES)],
        ),
    ]
}

/// JSONファイルからナビゲーション定義を読み込む
pub fn load_navigation(path: impl AsRef<Path>) -> AppResult<Vec<NavigationGroup>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read navigation config {}: {}",
            path.display(),
            e
        ))
    })?;
    let groups: Vec<NavigationGroup> = serde_json::from_str(&raw).map_err(|e| {
        AppError::Configuration(format!(
            "Invalid navigation config {}: {}",
            path.display(),
            e
        ))
    })?;

    info!(path = %path.display(), group_count = groups.len(), "Navigation config loaded");
    Ok(groups)
}

/// 設定値があればファイル、無ければ組み込み定義
pub fn navigation_from_config(path: Option<&str>) -> AppResult<Vec<NavigationGroup>> {
    match path {
        Some(path) => load_navigation(path),
        None => Ok(default_navigation()),
    }
}
