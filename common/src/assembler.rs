//! 照合結果の組み立て
//!
//! コード・説明の文字列化は失敗しても例外にせず "N/A" を返す。

use crate::index::ReferenceIndex;
use crate::types::{CellValue, MatchResult};

/// 変換できない値の表示
pub const NOT_AVAILABLE: &str = "N/A";

/// SNOMEDコードを整数表記の文字列にする
///
/// 数値として解釈 → 小数部切り捨て → 文字列。
/// 解釈できない場合は "N/A"。
pub fn format_code(code: &CellValue) -> String {
    let truncated = match code {
        CellValue::Number(n) => truncate(*n),
        CellValue::Text(s) => {
            let s = s.trim();
            // 精度を保つため整数表記はそのまま
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        CellValue::Empty | CellValue::Bool(_) => None,
    };

    truncated
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn truncate(n: f64) -> Option<i64> {
    if n.is_finite() && n.abs() < i64::MAX as f64 {
        Some(n.trunc() as i64)
    } else {
        None
    }
}

/// SNOMED説明を文字列にする（欠損は "N/A"）
pub fn format_description(description: &CellValue) -> String {
    if description.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        description.as_text()
    }
}

/// クエリと最良一致から照合結果を作る
///
/// `position` が範囲外の場合も "N/A" で埋めた結果を返す。
pub fn assemble(input_name: &str, position: usize, score: f64, index: &ReferenceIndex) -> MatchResult {
    match index.entry(position) {
        Some(entry) => MatchResult {
            input_name: input_name.to_string(),
            matched_name: entry.name.clone(),
            snomed_code: format_code(&entry.code),
            snomed_description: format_description(&entry.description),
            similarity_score: score,
        },
        None => MatchResult {
            input_name: input_name.to_string(),
            matched_name: String::new(),
            snomed_code: NOT_AVAILABLE.to_string(),
            snomed_description: NOT_AVAILABLE.to_string(),
            similarity_score: score,
        },
    }
}
