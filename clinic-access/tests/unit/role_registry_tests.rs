// tests/unit/role_registry_tests.rs

use clinic_access::domain::actor::Actor;
use clinic_access::domain::role_model::{Role, RoleName, RoleRef};
use clinic_access::error::AppError;
use clinic_access::service::role_registry::RoleRegistry;
use uuid::Uuid;

use crate::common::test_data::{standard_registry, standard_roles};

#[test]
fn test_registry_orders_roles_by_priority() {
    let mut roles = standard_roles();
    roles.reverse();
    let registry = RoleRegistry::from_roles(roles).unwrap();

    let names: Vec<&str> = registry.ordered().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Super Admin",
            "Administrator",
            "Clinic Admin",
            "Veterinarian",
            "Receptionist"
        ]
    );
}

#[test]
fn test_registry_rejects_duplicate_ids() {
    let role = Role::new("Veterinarian", 4, true);
    let duplicate = Role {
        name: "Receptionist".to_string(),
        ..role.clone()
    };

    let result = RoleRegistry::from_roles(vec![role, duplicate]);
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[test]
fn test_registry_rejects_blank_names() {
    let result = RoleRegistry::from_roles(vec![Role::new("   ", 3, true)]);
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[test]
fn test_role_ref_resolution_by_id_and_name() {
    let registry = standard_registry();
    let vet = registry.find_by_name("veterinarian").unwrap().clone();

    assert_eq!(registry.resolve(&RoleRef::ById(vet.id)), Some(&vet));
    assert_eq!(
        registry.resolve(&RoleRef::ByName("  VETERINARIAN ".to_string())),
        Some(&vet)
    );
    assert_eq!(registry.resolve(&RoleRef::ById(Uuid::new_v4())), None);
    assert_eq!(registry.resolve(&RoleRef::ByName("Groomer".to_string())), None);
}

#[test]
fn test_unknown_role_lookups_fail() {
    let registry = standard_registry();
    let unknown = Uuid::new_v4();

    assert!(matches!(
        registry.priority_of(unknown),
        Err(AppError::UnknownRole(_))
    ));
    assert!(matches!(
        registry.is_clinic_required(unknown),
        Err(AppError::UnknownRole(_))
    ));
}

#[test]
fn test_context_for_resolves_role_snapshot() {
    let registry = standard_registry();
    let admin = registry.find_by_name("Administrator").unwrap();
    let actor = Actor {
        id: Uuid::new_v4(),
        role_id: admin.id,
        company_id: Some(Uuid::new_v4()),
        clinic_ids: Vec::new(),
    };

    let ctx = registry.context_for(&actor);
    assert!(ctx.is_role_known());
    assert_eq!(ctx.role_kind(), Some(RoleName::Administrator));
    assert_eq!(ctx.priority(), Some(2));

    let stranger = Actor {
        role_id: Uuid::new_v4(),
        ..actor
    };
    let ctx = registry.context_for(&stranger);
    assert!(!ctx.is_role_known());
    assert_eq!(ctx.priority(), None);
}

#[test]
fn test_assignable_roles_are_strictly_weaker() {
    let registry = standard_registry();

    let names = |role: &str| -> Vec<String> {
        registry
            .assignable_roles(&RoleRef::ByName(role.to_string()))
            .iter()
            .map(|r| r.name.clone())
            .collect()
    };

    assert_eq!(
        names("Clinic Admin"),
        vec!["Veterinarian".to_string(), "Receptionist".to_string()]
    );
    assert!(names("Receptionist").is_empty());
    assert!(names("Groomer").is_empty());
    assert_eq!(names("Super Admin").len(), 4);
}
