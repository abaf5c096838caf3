// clinic-access/src/utils/path_pattern.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

/// `[id]` などのプレースホルダー
pub static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Za-z0-9_]+\]").expect("Invalid placeholder regex"));

/// プレースホルダーを置き換えるUUID形式のセグメント
pub const ID_SEGMENT_PATTERN: &str = "[0-9A-Za-z]+(?:-[0-9A-Za-z]+)*";

/// 動的パスパターンをコンパイル済みの正規表現にする
///
/// プレースホルダー以外の部分はリテラルとしてエスケープし、全体を完全一致させる。
pub fn compile_dynamic_pattern(pattern: &str) -> AppResult<Regex> {
    let mut source = String::from("^");
    let mut last = 0;

    for placeholder in PLACEHOLDER_REGEX.find_iter(pattern) {
        source.push_str(&regex::escape(&pattern[last..placeholder.start()]));
        source.push_str(ID_SEGMENT_PATTERN);
        last = placeholder.end();
    }
    source.push_str(&regex::escape(&pattern[last..]));
    source.push('$');

    Regex::new(&source).map_err(|e| {
        AppError::Configuration(format!("Invalid dynamic path pattern '{}': {}", pattern, e))
    })
}

/// `base` と同一か、`base + "/"` で始まるパスか
pub fn is_same_or_nested(path: &str, base: &str) -> bool {
    path == base
        || path
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}
