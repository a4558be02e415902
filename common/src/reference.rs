//! 参照マスタの読み込みとクリーニング
//!
//! 必須列: `tariff name`, `snomed code`, `snomed description`
//!
//! 1. 必須列のいずれかが欠損している行を除外
//! 2. 同じ名称（正規化後）が複数ある場合は最後の行を残す
//! 3. 参照インデックスを構築

use crate::error::{Error, Result};
use crate::index::ReferenceIndex;
use crate::normalizer::normalize_cell;
use crate::table::Sheet;
use crate::types::{CellValue, ReferenceEntry};
use std::collections::HashMap;
use tracing::debug;

pub const NAME_COLUMN: &str = "tariff name";
pub const CODE_COLUMN: &str = "snomed code";
pub const DESCRIPTION_COLUMN: &str = "snomed description";

/// 表から参照エントリを取り出す（インデックスは構築しない）
pub fn reference_entries(sheet: &Sheet) -> Result<Vec<ReferenceEntry>> {
    let missing: Vec<&str> = [NAME_COLUMN, CODE_COLUMN, DESCRIPTION_COLUMN]
        .into_iter()
        .filter(|column| !sheet.has_column(column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Load(format!(
            "reference data is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let name_col = column(sheet, NAME_COLUMN)?;
    let code_col = column(sheet, CODE_COLUMN)?;
    let description_col = column(sheet, DESCRIPTION_COLUMN)?;

    // 欠損行を除外
    let complete: Vec<ReferenceEntry> = (0..sheet.rows.len())
        .filter_map(|row| {
            let name = sheet.cell(row, name_col);
            let code = sheet.cell(row, code_col);
            let description = sheet.cell(row, description_col);
            if name.is_empty() || code.is_empty() || description.is_empty() {
                return None;
            }
            let name = reference_name(name);
            if name.is_empty() {
                return None;
            }
            Some(ReferenceEntry::new(name, code.clone(), description.clone()))
        })
        .collect();

    let dropped = sheet.rows.len() - complete.len();
    let entries = keep_last_by_name(complete);
    debug!(
        rows = sheet.rows.len(),
        dropped_incomplete = dropped,
        entries = entries.len(),
        "reference data cleaned"
    );

    if entries.is_empty() {
        return Err(Error::Load("reference data is empty after cleaning".into()));
    }

    Ok(entries)
}

/// 表から参照インデックスを構築する
pub fn load_reference(sheet: &Sheet) -> Result<ReferenceIndex> {
    let entries = reference_entries(sheet)?;
    ReferenceIndex::build(entries)
}

fn column(sheet: &Sheet, name: &str) -> Result<usize> {
    sheet
        .column_index(name)
        .ok_or_else(|| Error::Load(format!("reference data is missing column '{}'", name)))
}

/// 参照名称（数値セルも文字列として扱う）
fn reference_name(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(_) => normalize_cell(cell),
        other => normalize_cell(&CellValue::text(other.as_text())),
    }
}

/// 同名エントリは最後の出現のみ残す（残った行は元の順序）
fn keep_last_by_name(entries: Vec<ReferenceEntry>) -> Vec<ReferenceEntry> {
    let mut last: HashMap<&str, usize> = HashMap::new();
    for (position, entry) in entries.iter().enumerate() {
        last.insert(entry.name.as_str(), position);
    }
    let keep: Vec<bool> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| last.get(entry.name.as_str()) == Some(&position))
        .collect();

    entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, keep)| keep.then_some(entry))
        .collect()
}
