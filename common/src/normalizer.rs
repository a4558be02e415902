//! 名称の正規化とトークン分割
//!
//! 参照マスタ・クエリ・取り込みレコードの名称すべてに同じ規則を適用する。
//! どちらか一方だけに適用すると照合結果は意味を持たない。

use crate::types::CellValue;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 文字の連続 or 数字の連続（"500mg" → "500", "mg"）
    static ref TOKEN_RE: Regex = Regex::new(r"[^\W\d_]+|\d+").unwrap();
}

/// 名称を正規化する
///
/// - 小文字化
/// - 前後の空白を除去
/// - 改行を含む連続空白を単一スペースに
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// セル値を正規化する（文字列以外・欠損は空文字）
pub fn normalize_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => normalize(s),
        _ => String::new(),
    }
}

/// 正規化済みの名称をトークンに分割
///
/// トークン = 英字（Unicode文字）の連続、または数字の連続。
/// 記号・空白は区切りとして捨てる。
pub fn tokenize<'a>(normalized: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    TOKEN_RE.find_iter(normalized).map(|m| m.as_str())
}
