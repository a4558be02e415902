//! 照合で扱う型定義
//!
//! CLIと外部リクエスト層で共有される型:
//! - CellValue: 表データの1セル
//! - ReferenceEntry: 参照マスタの1行（名称・コード・説明）
//! - TariffRecord: 一括取り込みで得た1行
//! - MatchResult: 照合結果（1クエリにつき1件）

use serde::{Deserialize, Serialize};

/// 表データのセル値
///
/// Excel/JSONのどちらから読んでも同じ形に揃える。
/// JSON出力時は `Empty` が `null` になる。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 文字列からセルを作る（空文字は `Empty`）
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// JSON値をセルに変換
    ///
    /// 配列・オブジェクトはJSON文字列としてテキスト扱い
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            serde_json::Value::String(s) => CellValue::text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// テキストとして表示する値（`Empty` は空文字）
    ///
    /// 整数値の浮動小数は小数点なしで表示する（Excelの数値セル対策）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// 数値として解釈できれば返す
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 参照マスタの1エントリ
///
/// 名称・コード・説明を1つのレコードで保持する。
/// `name` は正規化済み。コードと説明は元のセル値のまま持ち、
/// 表示時に `assembler` で文字列化する。
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub name: String,
    pub code: CellValue,
    pub description: CellValue,
}

impl ReferenceEntry {
    pub fn new(name: impl Into<String>, code: CellValue, description: CellValue) -> Self {
        Self {
            name: name.into(),
            code,
            description,
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub input_name: String,
    pub matched_name: String,
    pub snomed_code: String,
    pub snomed_description: String,
    pub similarity_score: f64,
}

/// 一括取り込みの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TariffRecord {
    /// 正規化済みの `TARIFF NAME`
    pub name: String,
    /// `PRICE` 列（数値化できない場合は None）
    pub price: Option<f64>,
    /// 元シート名
    pub sheet_type: String,
    /// 元の全列（列名, 値）。列順を保持する
    pub columns: Vec<(String, CellValue)>,
}

impl TariffRecord {
    /// 元の列値を取得
    pub fn column(&self, name: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }
}

/// 照合結果を付加した取り込みレコード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedTariffRecord {
    #[serde(flatten)]
    pub record: TariffRecord,
    /// 同じ (名称, 価格) の行が後方にある場合 true
    pub duplicate: bool,
    #[serde(rename = "match")]
    pub matched: MatchResult,
}
