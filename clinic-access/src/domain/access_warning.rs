// clinic-access/src/domain/access_warning.rs
use serde::{Deserialize, Serialize};

/// 保守的なデフォルトを適用したことを示す警告
///
/// いずれも致命的ではなく、新しいデータが届いた時点で再評価すれば解消する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessWarning {
    /// ロールが現在のスナップショットに存在しない（権限なしとして扱う）
    UnknownRole,
    /// 会社・クリニックのスコープが解決できない（空の結果として扱う）
    MissingScope,
    /// 画面アクセス情報が未取得（ナビゲーションは全許可）
    StaleAccessData,
    /// 現在と異なるクリニックが指定されたが、切り替えはまだ適用していない
    ClinicSwitchRequired,
}

impl AccessWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownRole => "unknown_role",
            Self::MissingScope => "missing_scope",
            Self::StaleAccessData => "stale_access_data",
            Self::ClinicSwitchRequired => "clinic_switch_required",
        }
    }
}

impl std::fmt::Display for AccessWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 警告を重複なく追加する
pub fn push_warning(warnings: &mut Vec<AccessWarning>, warning: AccessWarning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}
