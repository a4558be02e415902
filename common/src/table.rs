//! 表データモデル
//!
//! シート名付きの複数シート文書を表す。Excelなどの読み込み実装は
//! `SheetSource` を実装して取り込み処理に渡す。

use crate::error::{Error, Result};
use crate::types::CellValue;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// 1シート分の表（1行目がヘッダー）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// 列番号（完全一致）
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// セル値（行が短い場合は Empty）
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// JSONから表を作る
    ///
    /// 対応形式:
    /// - レコード形式: `[{"col": value, ...}, ...]`
    /// - 列形式: `{"col": {"0": value, ...}, ...}`
    ///
    /// 列順は最初に出現した順。
    pub fn from_json(name: impl Into<String>, value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(records) => Self::from_json_records(name, records),
            serde_json::Value::Object(columns) => Self::from_json_columns(name, columns),
            _ => Err(Error::Load(
                "expected a JSON array of records or an object of columns".into(),
            )),
        }
    }

    /// JSON文字列から表を作る（形式は `from_json` と同じ）
    pub fn from_json_str(name: impl Into<String>, content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_json(name, &value)
    }

    fn from_json_records(name: impl Into<String>, records: &[serde_json::Value]) -> Result<Self> {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            let object = record
                .as_object()
                .ok_or_else(|| Error::Load("every JSON record must be an object".into()))?;
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(|record| record.as_object())
            .map(|object| {
                headers
                    .iter()
                    .map(|h| object.get(h).map(CellValue::from_json).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self::new(name, headers, rows))
    }

    fn from_json_columns(
        name: impl Into<String>,
        columns: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self> {
        let headers: Vec<String> = columns.keys().cloned().collect();

        // 行キーは最初に出現した順
        let mut row_keys: Vec<String> = Vec::new();
        for column in columns.values() {
            let cells = column
                .as_object()
                .ok_or_else(|| Error::Load("every JSON column must be an object of rows".into()))?;
            for key in cells.keys() {
                if !row_keys.contains(key) {
                    row_keys.push(key.clone());
                }
            }
        }

        let rows = row_keys
            .iter()
            .map(|key| {
                columns
                    .values()
                    .map(|column| {
                        column
                            .get(key)
                            .map(CellValue::from_json)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Ok(Self::new(name, headers, rows))
    }
}

/// シート単位で読み込める表データ
pub trait SheetSource {
    /// 文書内の全シート名（文書順）
    fn sheet_names(&self) -> Vec<String>;

    /// シートを読み込む
    fn read_sheet(&mut self, name: &str) -> Result<Sheet>;
}

/// メモリ上の複数シート文書
#[derive(Debug, Clone, Default)]
pub struct TabularDocument {
    sheets: Vec<Sheet>,
}

impl TabularDocument {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }
}

impl SheetSource for TabularDocument {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| Error::Sheet {
                sheet: name.to_string(),
                message: "sheet not found".into(),
            })
    }
}
