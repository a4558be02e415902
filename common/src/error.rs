//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 参照マスタの読み込み失敗（起動時に致命的）
    #[error("Reference load error: {0}")]
    Load(String),

    /// 語彙が構築できない（空のコーパスなど）
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    /// リクエストの入力不正
    #[error("Validation error: {0}")]
    Validation(String),

    /// 取り込み可能なシートが1つもない
    #[error("No valid sheets: no sheet with a '{column}' column yielded any rows")]
    NoValidSheets { column: String },

    /// シート単位の読み込み失敗（通常はスキップされる）
    #[error("Sheet '{sheet}' could not be read: {message}")]
    Sheet { sheet: String, message: String },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation("tariff_names list cannot be empty.".to_string());
        assert_eq!(
            format!("{}", error),
            "Validation error: tariff_names list cannot be empty."
        );
    }

    #[test]
    fn test_error_display_no_valid_sheets() {
        let error = Error::NoValidSheets {
            column: "TARIFF NAME".to_string(),
        };
        assert!(format!("{}", error).contains("TARIFF NAME"));
    }

    #[test]
    fn test_error_display_sheet() {
        let error = Error::Sheet {
            sheet: "Drugs".to_string(),
            message: "corrupt".to_string(),
        };
        assert_eq!(format!("{}", error), "Sheet 'Drugs' could not be read: corrupt");
    }
}
