// clinic-access/src/domain/scope.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 一覧クエリに適用する会社・クリニックのスコープ
///
/// `Empty` は「データなし」を意味し、絞り込みなしのクエリへ置き換えてはならない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectiveScope {
    /// 全会社（任意で選択中の会社に絞る）
    Unrestricted { company_id: Option<Uuid> },
    /// 自社のみ。`clinic_ids` が空なら自社の全クリニック
    Company {
        company_id: Uuid,
        clinic_ids: Vec<Uuid>,
    },
    /// 割り当てられたクリニックのみ（常に1件以上）
    Clinics {
        company_id: Option<Uuid>,
        clinic_ids: Vec<Uuid>,
    },
    Empty,
}

impl EffectiveScope {
    pub fn company_id(&self) -> Option<Uuid> {
        match self {
            Self::Unrestricted { company_id } | Self::Clinics { company_id, .. } => *company_id,
            Self::Company { company_id, .. } => Some(*company_id),
            Self::Empty => None,
        }
    }

    pub fn clinic_ids(&self) -> &[Uuid] {
        match self {
            Self::Company { clinic_ids, .. } | Self::Clinics { clinic_ids, .. } => clinic_ids,
            Self::Unrestricted { .. } | Self::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// レコードの所属がスコープ内か
    pub fn permits(&self, company_id: Option<Uuid>, clinic_id: Option<Uuid>) -> bool {
        match self {
            Self::Empty => false,
            Self::Unrestricted { company_id: None } => true,
            Self::Unrestricted {
                company_id: Some(selected),
            } => company_id == Some(*selected),
            Self::Company {
                company_id: own,
                clinic_ids,
            } => {
                company_id == Some(*own)
                    && (clinic_ids.is_empty() || clinic_id.is_some_and(|c| clinic_ids.contains(&c)))
            }
            Self::Clinics {
                company_id: own,
                clinic_ids,
            } => {
                own.is_none_or(|own| company_id.is_none_or(|c| c == own))
                    && clinic_id.is_some_and(|c| clinic_ids.contains(&c))
            }
        }
    }

    /// スコープ内のレコードだけを返す
    pub fn apply<'a, T: ScopedRecord>(&self, records: &'a [T]) -> Vec<&'a T> {
        records
            .iter()
            .filter(|r| self.permits(r.company_id(), r.clinic_id()))
            .collect()
    }
}

/// 会社・クリニックに所属するレコード
pub trait ScopedRecord {
    fn company_id(&self) -> Option<Uuid>;
    fn clinic_id(&self) -> Option<Uuid>;
}

/// UI側で選択されている会社・クリニック（URLクエリ由来）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSelection {
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub clinic_ids: Vec<Uuid>,
}

/// クリニック選択 UI の振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicSelector {
    /// 会社を任意に選択できる
    CompanyPicker,
    /// 自社のクリニックを複数選択できる
    MultiSelect,
    /// 割り当てクリニックから1つ選択できる
    SingleSelect,
    /// 割り当てクリニックに固定
    Locked,
    Hidden,
}

/// クリニック単位でキャッシュされるクエリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopedQuery {
    Inventory,
    PurchaseOrders,
    Suppliers,
    Products,
    Appointments,
    ClinicDetails,
}

impl ScopedQuery {
    pub const ALL: [ScopedQuery; 6] = [
        ScopedQuery::Inventory,
        ScopedQuery::PurchaseOrders,
        ScopedQuery::Suppliers,
        ScopedQuery::Products,
        ScopedQuery::Appointments,
        ScopedQuery::ClinicDetails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::PurchaseOrders => "purchase_orders",
            Self::Suppliers => "suppliers",
            Self::Products => "products",
            Self::Appointments => "appointments",
            Self::ClinicDetails => "clinic_details",
        }
    }
}

/// 無効化対象のキャッシュキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopedQueryKey {
    pub query: ScopedQuery,
    pub clinic_id: Uuid,
}

impl ScopedQueryKey {
    /// クリニックに紐づく全キー
    pub fn all_for_clinic(clinic_id: Uuid) -> Vec<Self> {
        ScopedQuery::ALL
            .iter()
            .map(|query| Self {
                query: *query,
                clinic_id,
            })
            .collect()
    }
}

impl std::fmt::Display for ScopedQueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.query.as_str(), self.clinic_id)
    }
}
