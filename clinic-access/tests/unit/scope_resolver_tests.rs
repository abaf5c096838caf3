// tests/unit/scope_resolver_tests.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use clinic_access::domain::access_warning::AccessWarning;
use clinic_access::domain::scope::{
    ClinicSelector, EffectiveScope, ScopeSelection, ScopedQuery, ScopedQueryKey, ScopedRecord,
};
use clinic_access::error::{AppError, AppResult};
use clinic_access::service::scope_resolver::{
    ClinicSelectionStore, InMemoryClinicSelectionStore, QueryInvalidator, ScopeResolver,
    CLINIC_QUERY_PARAM,
};
use uuid::Uuid;

use crate::common::test_data::{actor_with_unknown_role, context_for, standard_registry};

/// 保存と無効化の順序を記録するストア
#[derive(Default)]
struct RecordingStore {
    events: Arc<Mutex<Vec<String>>>,
    selections: Mutex<HashMap<Uuid, Uuid>>,
}

impl ClinicSelectionStore for RecordingStore {
    fn load(&self, actor_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self.selections.lock().unwrap().get(&actor_id).copied())
    }

    fn save(&self, actor_id: Uuid, clinic_id: Uuid) -> AppResult<()> {
        self.events.lock().unwrap().push(format!("save:{}", clinic_id));
        self.selections.lock().unwrap().insert(actor_id, clinic_id);
        Ok(())
    }
}

struct RecordingInvalidator {
    events: Arc<Mutex<Vec<String>>>,
}

impl QueryInvalidator for RecordingInvalidator {
    fn invalidate(&mut self, key: ScopedQueryKey) {
        self.events.lock().unwrap().push(format!("invalidate:{}", key));
    }
}

struct InventoryItem {
    company_id: Option<Uuid>,
    clinic_id: Option<Uuid>,
}

impl ScopedRecord for InventoryItem {
    fn company_id(&self) -> Option<Uuid> {
        self.company_id
    }

    fn clinic_id(&self) -> Option<Uuid> {
        self.clinic_id
    }
}

fn resolver() -> ScopeResolver<InMemoryClinicSelectionStore> {
    ScopeResolver::new(InMemoryClinicSelectionStore::new())
}

#[test]
fn test_clinic_admin_without_clinics_sees_no_inventory() {
    let registry = standard_registry();
    let company = Uuid::new_v4();
    let ctx = context_for(&registry, "Clinic Admin", Some(company), Vec::new());

    let resolution = resolver()
        .resolve(&ctx, &ScopeSelection::default())
        .unwrap();
    assert_eq!(resolution.scope, EffectiveScope::Empty);
    assert!(resolution.scope.clinic_ids().is_empty());
    assert_eq!(resolution.warnings, vec![AccessWarning::MissingScope]);

    let inventory = vec![
        InventoryItem {
            company_id: Some(company),
            clinic_id: Some(Uuid::new_v4()),
        },
        InventoryItem {
            company_id: Some(company),
            clinic_id: None,
        },
    ];
    assert!(resolution.scope.apply(&inventory).is_empty());
}

#[test]
fn test_super_admin_scope_is_unrestricted() {
    let registry = standard_registry();
    let ctx = context_for(&registry, "Super Admin", None, Vec::new());
    let company = Uuid::new_v4();

    let resolution = resolver()
        .resolve(
            &ctx,
            &ScopeSelection {
                company_id: Some(company),
                clinic_ids: Vec::new(),
            },
        )
        .unwrap();

    assert_eq!(
        resolution.scope,
        EffectiveScope::Unrestricted {
            company_id: Some(company)
        }
    );
    assert_eq!(resolution.selector, ClinicSelector::CompanyPicker);
    assert!(resolution.scope.permits(Some(company), None));
    assert!(!resolution.scope.permits(Some(Uuid::new_v4()), None));
}

#[test]
fn test_administrator_scope_is_company_wide() {
    let registry = standard_registry();
    let company = Uuid::new_v4();
    let ctx = context_for(&registry, "Administrator", Some(company), Vec::new());

    let resolution = resolver()
        .resolve(&ctx, &ScopeSelection::default())
        .unwrap();
    assert_eq!(resolution.selector, ClinicSelector::MultiSelect);
    assert!(resolution.scope.permits(Some(company), Some(Uuid::new_v4())));
    assert!(!resolution.scope.permits(Some(Uuid::new_v4()), Some(Uuid::new_v4())));

    let no_company = context_for(&registry, "Administrator", None, Vec::new());
    let resolution = resolver()
        .resolve(&no_company, &ScopeSelection::default())
        .unwrap();
    assert_eq!(resolution.scope, EffectiveScope::Empty);
    assert_eq!(resolution.warnings, vec![AccessWarning::MissingScope]);
}

#[test]
fn test_clinic_bound_roles_are_locked_to_assigned_clinics() {
    let registry = standard_registry();
    let clinics = vec![Uuid::new_v4(), Uuid::new_v4()];

    for role in ["Clinic Admin", "Receptionist"] {
        let ctx = context_for(&registry, role, None, clinics.clone());
        let resolution = resolver()
            .resolve(&ctx, &ScopeSelection::default())
            .unwrap();
        assert_eq!(resolution.selector, ClinicSelector::Locked);
        assert_eq!(resolution.scope.clinic_ids(), clinics.as_slice());
    }
}

#[test]
fn test_unknown_role_resolves_empty_scope() {
    let registry = standard_registry();
    let ctx = registry.context_for(&actor_with_unknown_role(vec![Uuid::new_v4()]));

    let resolution = resolver()
        .resolve(&ctx, &ScopeSelection::default())
        .unwrap();
    assert!(resolution.scope.is_empty());
    assert_eq!(resolution.warnings, vec![AccessWarning::UnknownRole]);
}

fn clinic_selection(clinic_id: Uuid) -> ScopeSelection {
    ScopeSelection {
        company_id: None,
        clinic_ids: vec![clinic_id],
    }
}

#[test]
fn test_veterinarian_resolve_keeps_current_clinic_until_switched() {
    let registry = standard_registry();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let ctx = context_for(&registry, "Veterinarian", None, vec![first, second]);
    let resolver = resolver();

    let default = resolver.resolve(&ctx, &ScopeSelection::default()).unwrap();
    assert_eq!(default.selector, ClinicSelector::SingleSelect);
    assert_eq!(default.scope.clinic_ids(), &[first]);

    // 切り替え前の別クリニック指定は適用されない
    let requested = resolver.resolve(&ctx, &clinic_selection(second)).unwrap();
    assert_eq!(requested.scope.clinic_ids(), &[first]);
    assert_eq!(requested.warnings, vec![AccessWarning::ClinicSwitchRequired]);

    let current = resolver.resolve(&ctx, &clinic_selection(first)).unwrap();
    assert!(current.warnings.is_empty());

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    resolver.switch_clinic(&ctx, second, &mut invalidated).unwrap();
    let persisted = resolver.resolve(&ctx, &ScopeSelection::default()).unwrap();
    assert_eq!(persisted.scope.clinic_ids(), &[second]);

    let foreign = resolver
        .resolve(&ctx, &clinic_selection(Uuid::new_v4()))
        .unwrap();
    assert_eq!(foreign.scope.clinic_ids(), &[second]);
    assert_eq!(foreign.warnings, vec![AccessWarning::MissingScope]);
}

#[test]
fn test_clinic_switch_invalidates_previous_clinic_before_saving() {
    let registry = standard_registry();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let ctx = context_for(&registry, "Veterinarian", None, vec![first, second]);

    let store = RecordingStore::default();
    let events = Arc::clone(&store.events);
    let resolver = ScopeResolver::new(store);
    let mut invalidator = RecordingInvalidator {
        events: Arc::clone(&events),
    };

    let switch = resolver.switch_clinic(&ctx, second, &mut invalidator).unwrap();

    assert_eq!(switch.previous_clinic_id, first);
    assert_eq!(switch.query_state.param, CLINIC_QUERY_PARAM);
    assert_eq!(switch.query_state.value, second.to_string());

    let recorded = events.lock().unwrap().clone();
    assert_eq!(recorded.len(), ScopedQuery::ALL.len() + 1);
    assert_eq!(recorded.last().unwrap(), &format!("save:{}", second));
    assert!(recorded[..ScopedQuery::ALL.len()]
        .iter()
        .all(|event| event.starts_with("invalidate:")));
    assert!(recorded.contains(&format!("invalidate:inventory:{}", first)));
}

#[test]
fn test_switch_to_current_clinic_invalidates_nothing() {
    let registry = standard_registry();
    let first = Uuid::new_v4();
    let ctx = context_for(&registry, "Veterinarian", None, vec![first, Uuid::new_v4()]);

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    let switch = resolver()
        .switch_clinic(&ctx, first, &mut invalidated)
        .unwrap();
    assert_eq!(switch.previous_clinic_id, first);
    assert!(invalidated.is_empty());
}

#[test]
fn test_url_clinic_change_is_persisted_after_invalidation() {
    let registry = standard_registry();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let ctx = context_for(&registry, "Veterinarian", None, vec![first, second]);

    let store = RecordingStore::default();
    let events = Arc::clone(&store.events);
    let resolver = ScopeResolver::new(store);

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    let applied = resolver
        .apply_selection(&ctx, &clinic_selection(second), &mut invalidated)
        .unwrap();

    assert_eq!(applied.scope.clinic_ids(), &[second]);
    assert!(applied.warnings.is_empty());
    assert_eq!(invalidated.len(), ScopedQuery::ALL.len());
    assert!(invalidated.iter().all(|key| key.clinic_id == first));
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[format!("save:{}", second)]
    );

    // 以降の既定の解決でも保存済みの選択が使われる
    let later = resolver.resolve(&ctx, &ScopeSelection::default()).unwrap();
    assert_eq!(later.scope.clinic_ids(), &[second]);

    // 同じクリニックを再指定しても何も起きない
    let mut again: Vec<ScopedQueryKey> = Vec::new();
    resolver
        .apply_selection(&ctx, &clinic_selection(second), &mut again)
        .unwrap();
    assert!(again.is_empty());
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_apply_selection_without_switch_rights_only_resolves() {
    let registry = standard_registry();
    let clinics = vec![Uuid::new_v4(), Uuid::new_v4()];
    let ctx = context_for(&registry, "Receptionist", None, clinics.clone());

    let store = RecordingStore::default();
    let events = Arc::clone(&store.events);
    let resolver = ScopeResolver::new(store);

    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();
    let applied = resolver
        .apply_selection(&ctx, &clinic_selection(clinics[1]), &mut invalidated)
        .unwrap();

    assert_eq!(applied.selector, ClinicSelector::Locked);
    assert_eq!(applied.scope.clinic_ids(), clinics.as_slice());
    assert!(invalidated.is_empty());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_clinic_switch_rejections() {
    let registry = standard_registry();
    let clinic = Uuid::new_v4();
    let mut invalidated: Vec<ScopedQueryKey> = Vec::new();

    let single_clinic_vet = context_for(&registry, "Veterinarian", None, vec![clinic]);
    assert!(matches!(
        resolver().switch_clinic(&single_clinic_vet, clinic, &mut invalidated),
        Err(AppError::Forbidden(_))
    ));

    let receptionist = context_for(&registry, "Receptionist", None, vec![clinic, Uuid::new_v4()]);
    assert!(matches!(
        resolver().switch_clinic(&receptionist, clinic, &mut invalidated),
        Err(AppError::Forbidden(_))
    ));

    let vet = context_for(&registry, "Veterinarian", None, vec![clinic, Uuid::new_v4()]);
    assert!(matches!(
        resolver().switch_clinic(&vet, Uuid::new_v4(), &mut invalidated),
        Err(AppError::Forbidden(_))
    ));

    let unknown = registry.context_for(&actor_with_unknown_role(vec![clinic, Uuid::new_v4()]));
    assert!(matches!(
        resolver().switch_clinic(&unknown, clinic, &mut invalidated),
        Err(AppError::UnknownRole(_))
    ));
    assert!(invalidated.is_empty());
}
