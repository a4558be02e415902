//! Excel生成（共通ライブラリ）
//!
//! 照合結果をワークブックとしてバッファに書き出す。
//! 一括照合の出力には `SUMMARY` シートを付けるため、
//! 出力ファイルを再度取り込んでも集計シートは対象外になる。

use crate::matcher::BulkMatchReport;
use crate::types::{CellValue, MatchResult};
use rust_xlsxwriter::*;

/// 照合結果シート名
pub const MATCHED_SHEET: &str = "MATCHED";
/// 集計シート名
pub const SUMMARY_SHEET: &str = "SUMMARY";

/// 照合結果として追加する列
pub const RESULT_COLUMNS: [&str; 6] = [
    "SHEET TYPE",
    "MATCHED NAME",
    "SNOMED CODE",
    "SNOMED DESCRIPTION",
    "SIMILARITY SCORE",
    "DUPLICATE",
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn col_num(col: usize) -> Result<u16, String> {
    u16::try_from(col).map_err(|_| format!("列数が多すぎます: {}", col))
}

fn row_num(row: usize) -> Result<u32, String> {
    u32::try_from(row).map_err(|_| format!("行数が多すぎます: {}", row))
}

/// セル値を書き込む（Emptyは何もしない）
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<(), String> {
    match value {
        CellValue::Empty => Ok(()),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
        CellValue::Number(n) => worksheet.write_number(row, col, *n).map(|_| ()),
        CellValue::Text(s) => worksheet.write_string(row, col, s.as_str()).map(|_| ()),
    }
    .map_err(|e| format!("セル書き込みエラー: {}", e))
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), String> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_num(col)?, *header, &format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}

/// 元の列の和集合（出現順）
///
/// 照合結果列と同名の列は含めない（再取り込みした出力でも見出しが重複しない）。
fn source_columns(report: &BulkMatchReport) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for matched in &report.records {
        for (column, _) in &matched.record.columns {
            let column = column.as_str();
            if !RESULT_COLUMNS.contains(&column) && !columns.contains(&column) {
                columns.push(column);
            }
        }
    }
    columns
}

/// 一括照合の結果をExcelバッファに生成
///
/// `MATCHED` シート: 元の列（全シートの和集合、出現順）+ 照合結果列
/// `SUMMARY` シート: 総行数・重複行数・スキップしたシート
pub fn generate_bulk_workbook(report: &BulkMatchReport) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let source_columns = source_columns(report);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(MATCHED_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    let headers: Vec<&str> = source_columns
        .iter()
        .copied()
        .chain(RESULT_COLUMNS.iter().copied())
        .collect();
    write_headers(worksheet, &headers)?;

    let result_start = source_columns.len();
    for (i, matched) in report.records.iter().enumerate() {
        let row = row_num(i + 1)?;

        for (col, column) in source_columns.iter().enumerate() {
            if let Some(value) = matched.record.column(column) {
                write_cell(worksheet, row, col_num(col)?, value)?;
            }
        }

        let result_cells = [
            CellValue::text(matched.record.sheet_type.clone()),
            CellValue::text(matched.matched.matched_name.clone()),
            CellValue::text(matched.matched.snomed_code.clone()),
            CellValue::text(matched.matched.snomed_description.clone()),
            CellValue::Number(matched.matched.similarity_score),
            CellValue::Bool(matched.duplicate),
        ];
        for (offset, value) in result_cells.iter().enumerate() {
            write_cell(worksheet, row, col_num(result_start + offset)?, value)?;
        }
    }
    worksheet.autofit();

    let summary = workbook.add_worksheet();
    summary
        .set_name(SUMMARY_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(summary, &["ITEM", "VALUE"])?;

    let mut rows: Vec<(String, CellValue)> = vec![
        ("TOTAL ROWS".to_string(), CellValue::Number(report.total_rows as f64)),
        ("DUPLICATED ROWS".to_string(), CellValue::Number(report.duplicated_rows as f64)),
    ];
    for skipped in &report.skipped_sheets {
        rows.push((
            format!("SKIPPED SHEET: {}", skipped.sheet),
            CellValue::text(skipped.reason.to_string()),
        ));
    }
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = row_num(i + 1)?;
        summary
            .write_string(row, 0, label.as_str())
            .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        write_cell(summary, row, 1, value)?;
    }
    summary.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// 名称リストの照合結果をExcelバッファに生成
pub fn generate_match_workbook(results: &[MatchResult]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(MATCHED_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    write_headers(
        worksheet,
        &[
            "INPUT NAME",
            "MATCHED NAME",
            "SNOMED CODE",
            "SNOMED DESCRIPTION",
            "SIMILARITY SCORE",
        ],
    )?;

    for (i, result) in results.iter().enumerate() {
        let row = row_num(i + 1)?;
        let cells = [
            CellValue::text(result.input_name.clone()),
            CellValue::text(result.matched_name.clone()),
            CellValue::text(result.snomed_code.clone()),
            CellValue::text(result.snomed_description.clone()),
            CellValue::Number(result.similarity_score),
        ];
        for (col, value) in cells.iter().enumerate() {
            write_cell(worksheet, row, col_num(col)?, value)?;
        }
    }
    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
