//! ワークブック読み込み（calamine）
//!
//! xlsx/xlsm/xls/xlsb/ods を `SheetSource` として扱えるようにする。
//! 各シートは1行目をヘッダーとして読み込む。途中の空行は1行として残す。

use crate::error::{MapperError, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use snomed_mapper_common::{CellValue, Sheet, SheetSource};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// calamineで読み込めるワークブックの拡張子
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// 拡張子がワークブック形式か
pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// calamineのワークブック
pub struct ExcelSource<RS> {
    workbook: Sheets<RS>,
}

impl ExcelSource<BufReader<File>> {
    /// ファイルから開く
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MapperError::FileNotFound(path.display().to_string()));
        }
        if !is_workbook_path(path) {
            return Err(MapperError::UnsupportedFormat(path.display().to_string()));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| MapperError::Workbook(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), sheets = workbook.sheet_names().len(), "workbook opened");
        Ok(Self { workbook })
    }
}

impl ExcelSource<Cursor<Vec<u8>>> {
    /// メモリ上のバイト列から開く（アップロードされたファイルなど）
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| MapperError::Workbook(e.to_string()))?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek> ExcelSource<RS> {
    /// 先頭シートを読み込む
    pub fn first_sheet(&mut self) -> Result<Sheet> {
        let name = self
            .workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MapperError::Workbook("ワークシートがありません".into()))?;
        Ok(self.read_sheet(&name)?)
    }
}

impl<RS: Read + Seek> SheetSource for ExcelSource<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> snomed_mapper_common::Result<Sheet> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| snomed_mapper_common::Error::Sheet {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(sheet_from_range(name, &range))
    }
}

/// calamineのセル範囲を表に変換
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows_iter = range.rows();

    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell_value(cell) {
                CellValue::Empty => format!("Unnamed: {}", i),
                value => value.as_text(),
            })
            .collect(),
        None => Vec::new(),
    };

    let mut rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    // 途中の空行は残し、末尾の空行だけ除く
    while rows
        .last()
        .is_some_and(|values| values.iter().all(CellValue::is_empty))
    {
        rows.pop();
    }

    Sheet::new(name, headers, rows)
}

/// calamineのセル値を変換
///
/// エラーセル（#N/Aなど）は欠損扱い
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.clone()),
    }
}
