// clinic-access/src/service/scope_resolver.rs
use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::access_warning::{push_warning, AccessWarning};
use crate::domain::actor::AccessContext;
use crate::domain::role_model::RoleName;
use crate::domain::scope::{ClinicSelector, EffectiveScope, ScopeSelection, ScopedQueryKey};
use crate::error::{AppError, AppResult};
use crate::utils::permission::PermissionChecker;

/// URLクエリに書き戻すクリニック選択のキー
pub const CLINIC_QUERY_PARAM: &str = "clinicId";

/// 選択中クリニックの永続化先（クライアント側の永続ストアに相当）
pub trait ClinicSelectionStore {
    fn load(&self, actor_id: Uuid) -> AppResult<Option<Uuid>>;
    fn save(&self, actor_id: Uuid, clinic_id: Uuid) -> AppResult<()>;
}

/// クリニック単位のキャッシュ無効化先
pub trait QueryInvalidator {
    fn invalidate(&mut self, key: ScopedQueryKey);
}

impl QueryInvalidator for Vec<ScopedQueryKey> {
    fn invalidate(&mut self, key: ScopedQueryKey) {
        self.push(key);
    }
}

/// プロセス内で保持する選択ストア
#[derive(Debug, Default)]
pub struct InMemoryClinicSelectionStore {
    selections: RwLock<HashMap<Uuid, Uuid>>,
}

impl InMemoryClinicSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClinicSelectionStore for InMemoryClinicSelectionStore {
    fn load(&self, actor_id: Uuid) -> AppResult<Option<Uuid>> {
        let selections = self
            .selections
            .read()
            .map_err(|_| AppError::InternalServerError("Clinic selection store poisoned".into()))?;
        Ok(selections.get(&actor_id).copied())
    }

    fn save(&self, actor_id: Uuid, clinic_id: Uuid) -> AppResult<()> {
        let mut selections = self
            .selections
            .write()
            .map_err(|_| AppError::InternalServerError("Clinic selection store poisoned".into()))?;
        selections.insert(actor_id, clinic_id);
        Ok(())
    }
}

/// スコープ解決の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeResolution {
    pub scope: EffectiveScope,
    pub selector: ClinicSelector,
    pub warnings: Vec<AccessWarning>,
}

impl ScopeResolution {
    fn empty(warning: AccessWarning) -> Self {
        Self {
            scope: EffectiveScope::Empty,
            selector: ClinicSelector::Hidden,
            warnings: vec![warning],
        }
    }
}

/// クリニック切り替えの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicSwitch {
    pub previous_clinic_id: Uuid,
    pub clinic_id: Uuid,
    pub query_state: QueryState,
    pub resolution: ScopeResolution,
}

/// URLクエリに反映するパラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub param: String,
    pub value: String,
}

/// 一覧クエリ用の会社・クリニックのスコープを決める
pub struct ScopeResolver<S> {
    store: S,
}

impl<S: ClinicSelectionStore> ScopeResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 副作用なしでスコープを解決する
    ///
    /// 現在と異なるクリニックの指定は適用せず `ClinicSwitchRequired` を返す。
    pub fn resolve(
        &self,
        ctx: &AccessContext,
        selection: &ScopeSelection,
    ) -> AppResult<ScopeResolution> {
        if !ctx.is_role_known() {
            warn!(
                actor_id = %ctx.actor.id,
                role_id = %ctx.actor.role_id,
                "Unknown role, resolving empty scope"
            );
            return Ok(ScopeResolution::empty(AccessWarning::UnknownRole));
        }

        if PermissionChecker::is_privileged_override(ctx) {
            return Ok(ScopeResolution {
                scope: EffectiveScope::Unrestricted {
                    company_id: selection.company_id,
                },
                selector: ClinicSelector::CompanyPicker,
                warnings: Vec::new(),
            });
        }

        if ctx.role_kind() == Some(RoleName::Administrator) {
            let Some(company_id) = ctx.actor.company_id else {
                warn!(
                    actor_id = %ctx.actor.id,
                    "Administrator has no company, resolving empty scope"
                );
                return Ok(ScopeResolution::empty(AccessWarning::MissingScope));
            };
            return Ok(ScopeResolution {
                scope: EffectiveScope::Company {
                    company_id,
                    clinic_ids: selection.clinic_ids.clone(),
                },
                selector: ClinicSelector::MultiSelect,
                warnings: Vec::new(),
            });
        }

        self.resolve_clinic_bound(ctx, selection)
    }

    /// クリニックに縛られるロール（Clinic Admin / Veterinarian / Receptionist / その他）
    fn resolve_clinic_bound(
        &self,
        ctx: &AccessContext,
        selection: &ScopeSelection,
    ) -> AppResult<ScopeResolution> {
        let assigned = &ctx.actor.clinic_ids;
        if assigned.is_empty() {
            warn!(
                actor_id = %ctx.actor.id,
                role = ?ctx.role_name(),
                "Actor has no assigned clinics, resolving empty scope"
            );
            return Ok(ScopeResolution::empty(AccessWarning::MissingScope));
        }

        if is_clinic_overridable(ctx) {
            let clinic_id = self.current_clinic(ctx)?;

            let mut warnings = Vec::new();
            if !selection.clinic_ids.is_empty() {
                match requested_clinic(ctx, selection) {
                    // 割り当て外のクリニックは無視して現在の選択に戻す
                    None => push_warning(&mut warnings, AccessWarning::MissingScope),
                    Some(requested) if requested != clinic_id => {
                        push_warning(&mut warnings, AccessWarning::ClinicSwitchRequired)
                    }
                    Some(_) => {}
                }
            }

            return Ok(ScopeResolution {
                scope: EffectiveScope::Clinics {
                    company_id: ctx.actor.company_id,
                    clinic_ids: vec![clinic_id],
                },
                selector: ClinicSelector::SingleSelect,
                warnings,
            });
        }

        Ok(ScopeResolution {
            scope: EffectiveScope::Clinics {
                company_id: ctx.actor.company_id,
                clinic_ids: assigned.clone(),
            },
            selector: ClinicSelector::Locked,
            warnings: Vec::new(),
        })
    }

    /// URLの選択を反映してスコープを解決する
    ///
    /// 現在と異なる割り当て済みクリニックが指定されたら `switch_clinic` を経由する。
    pub fn apply_selection(
        &self,
        ctx: &AccessContext,
        selection: &ScopeSelection,
        invalidator: &mut impl QueryInvalidator,
    ) -> AppResult<ScopeResolution> {
        if is_clinic_overridable(ctx) {
            if let Some(requested) = requested_clinic(ctx, selection) {
                if requested != self.current_clinic(ctx)? {
                    let switch = self.switch_clinic(ctx, requested, invalidator)?;
                    return Ok(switch.resolution);
                }
            }
        }
        self.resolve(ctx, selection)
    }

    /// 保存済みの選択、なければ最初の割り当てクリニック
    fn current_clinic(&self, ctx: &AccessContext) -> AppResult<Uuid> {
        let persisted = self
            .store
            .load(ctx.actor.id)?
            .filter(|id| ctx.actor.is_assigned_to(*id));
        persisted
            .or_else(|| ctx.actor.clinic_ids.first().copied())
            .ok_or_else(|| AppError::Forbidden("No clinic is assigned to this user".to_string()))
    }

    /// 複数クリニックに所属する Veterinarian のクリニック切り替え
    ///
    /// 旧クリニックのキャッシュをすべて無効化してから新しい選択を保存する。
    pub fn switch_clinic(
        &self,
        ctx: &AccessContext,
        clinic_id: Uuid,
        invalidator: &mut impl QueryInvalidator,
    ) -> AppResult<ClinicSwitch> {
        if !ctx.is_role_known() {
            return Err(AppError::UnknownRole(ctx.actor.role_id.to_string()));
        }
        if !is_clinic_overridable(ctx) {
            return Err(AppError::Forbidden(
                "Clinic selection is fixed for this user".to_string(),
            ));
        }
        if !ctx.actor.is_assigned_to(clinic_id) {
            return Err(AppError::Forbidden(format!(
                "Clinic {} is not assigned to this user",
                clinic_id
            )));
        }

        let previous = self.current_clinic(ctx)?;

        let mut invalidated = 0;
        if previous != clinic_id {
            for key in ScopedQueryKey::all_for_clinic(previous) {
                invalidator.invalidate(key);
                invalidated += 1;
            }
        }

        self.store.save(ctx.actor.id, clinic_id)?;

        info!(
            actor_id = %ctx.actor.id,
            previous_clinic_id = %previous,
            clinic_id = %clinic_id,
            invalidated,
            "Clinic selection switched"
        );

        Ok(ClinicSwitch {
            previous_clinic_id: previous,
            clinic_id,
            query_state: QueryState {
                param: CLINIC_QUERY_PARAM.to_string(),
                value: clinic_id.to_string(),
            },
            resolution: ScopeResolution {
                scope: EffectiveScope::Clinics {
                    company_id: ctx.actor.company_id,
                    clinic_ids: vec![clinic_id],
                },
                selector: ClinicSelector::SingleSelect,
                warnings: Vec::new(),
            },
        })
    }
}

fn requested_clinic(ctx: &AccessContext, selection: &ScopeSelection) -> Option<Uuid> {
    selection
        .clinic_ids
        .iter()
        .copied()
        .find(|id| ctx.actor.is_assigned_to(*id))
}

/// 利用者がクリニックを選び直せるのは複数クリニック所属の Veterinarian のみ
fn is_clinic_overridable(ctx: &AccessContext) -> bool {
    ctx.role_kind() == Some(RoleName::Veterinarian) && ctx.actor.clinic_ids.len() > 1
}
