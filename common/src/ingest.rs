//! 一括取り込みと重複検出
//!
//! ## 処理フロー
//! 1. `SUMMARY` 以外のシートのうち `TARIFF NAME` 列を持つものを読み込む
//! 2. 全シートの行を連結（各行に元シート名を付与）
//! 3. 名称を文字列化・正規化
//! 4. (名称, 価格) の重複を検出（各グループの最後の行は重複扱いしない）

use crate::error::{Error, Result};
use crate::normalizer::normalize;
use crate::table::{Sheet, SheetSource};
use crate::types::{CellValue, TariffRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 取り込みオプション
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// 取り込み対象外のシート名
    pub summary_sheet: String,
    /// 名称列（完全一致）
    pub name_column: String,
    /// 価格列
    pub price_column: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            summary_sheet: "SUMMARY".to_string(),
            name_column: "TARIFF NAME".to_string(),
            price_column: "PRICE".to_string(),
        }
    }
}

/// スキップしたシート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSheet {
    pub sheet: String,
    pub reason: SkipReason,
}

/// スキップ理由
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    /// 集計シート
    Summary,
    /// 名称列がない
    MissingNameColumn,
    /// 読み込み失敗
    ParseFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Summary => write!(f, "summary sheet"),
            SkipReason::MissingNameColumn => write!(f, "no tariff name column"),
            SkipReason::ParseFailed(message) => write!(f, "parse failed: {}", message),
        }
    }
}

/// 取り込み結果
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// 連結後の全レコード（文書順）
    pub records: Vec<TariffRecord>,
    /// 各レコードの重複フラグ（records と同じ並び）
    pub duplicate_flags: Vec<bool>,
    /// 連結後の行数
    pub total_rows: usize,
    /// 重複行数（各グループの最後の行は除く）
    pub duplicated_rows: usize,
    pub skipped_sheets: Vec<SkippedSheet>,
}

/// 表データを取り込む
pub fn ingest<S: SheetSource>(source: &mut S, options: &IngestOptions) -> Result<IngestOutcome> {
    let mut records = Vec::new();
    let mut skipped_sheets = Vec::new();
    let mut usable_sheets = 0;

    for name in source.sheet_names() {
        if name == options.summary_sheet {
            debug!(sheet = %name, "skipping summary sheet");
            skipped_sheets.push(SkippedSheet {
                sheet: name,
                reason: SkipReason::Summary,
            });
            continue;
        }

        let sheet = match source.read_sheet(&name) {
            Ok(sheet) => sheet,
            Err(e) => {
                warn!(sheet = %name, error = %e, "skipping sheet that failed to parse");
                skipped_sheets.push(SkippedSheet {
                    sheet: name,
                    reason: SkipReason::ParseFailed(e.to_string()),
                });
                continue;
            }
        };

        let Some(rows) = sheet_records(&sheet, options) else {
            debug!(sheet = %name, column = %options.name_column, "skipping sheet without name column");
            skipped_sheets.push(SkippedSheet {
                sheet: name,
                reason: SkipReason::MissingNameColumn,
            });
            continue;
        };

        if !rows.is_empty() {
            usable_sheets += 1;
        }
        records.extend(rows);
    }

    if usable_sheets == 0 {
        return Err(Error::NoValidSheets {
            column: options.name_column.clone(),
        });
    }

    let duplicate_flags = duplicate_flags(&records, &options.price_column);
    let duplicated_rows = duplicate_flags.iter().filter(|d| **d).count();

    Ok(IngestOutcome {
        total_rows: records.len(),
        duplicated_rows,
        duplicate_flags,
        records,
        skipped_sheets,
    })
}

/// シートの各行をレコードに変換（名称列がなければ None）
fn sheet_records(sheet: &Sheet, options: &IngestOptions) -> Option<Vec<TariffRecord>> {
    let name_col = sheet.column_index(&options.name_column)?;
    let price_col = sheet.column_index(&options.price_column);

    let records = (0..sheet.rows.len())
        .map(|row| TariffRecord {
            name: record_name(sheet.cell(row, name_col)),
            price: price_col.and_then(|col| sheet.cell(row, col).as_number()),
            sheet_type: sheet.name.clone(),
            columns: sheet
                .headers
                .iter()
                .enumerate()
                .map(|(col, header)| (header.clone(), sheet.cell(row, col).clone()))
                .collect(),
        })
        .collect();

    Some(records)
}

/// 名称セルを文字列化して正規化
fn record_name(cell: &CellValue) -> String {
    normalize(&cell.as_text())
}

/// 重複判定に使う価格セルの値
#[derive(Debug, PartialEq, Eq, Hash)]
enum PriceKey {
    Missing,
    Number(u64),
    Bool(bool),
    Text(String),
}

impl PriceKey {
    /// 数値として読めるセルは数値で比較（"100" と 100 は同じ）
    fn of(cell: Option<&CellValue>) -> Self {
        let Some(cell) = cell else {
            return PriceKey::Missing;
        };
        if let Some(n) = cell.as_number() {
            // -0.0 と 0.0 を同一視
            return PriceKey::Number((n + 0.0).to_bits());
        }
        match cell {
            CellValue::Empty => PriceKey::Missing,
            CellValue::Bool(b) => PriceKey::Bool(*b),
            other => PriceKey::Text(other.as_text().trim().to_string()),
        }
    }
}

/// 重複フラグを計算
///
/// (名称, 価格セル) が同じ行のうち、最後の1行以外を重複とする。
/// 価格は元のセル値で比較する（数値化できない文字列も区別する）。
pub fn duplicate_flags(records: &[TariffRecord], price_column: &str) -> Vec<bool> {
    let keys: Vec<(&str, PriceKey)> = records
        .iter()
        .map(|r| (r.name.as_str(), PriceKey::of(r.column(price_column))))
        .collect();

    let mut last: HashMap<&(&str, PriceKey), usize> = HashMap::new();
    for (position, key) in keys.iter().enumerate() {
        last.insert(key, position);
    }

    keys.iter()
        .enumerate()
        .map(|(position, key)| last.get(key) != Some(&position))
        .collect()
}
