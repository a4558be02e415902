//! 照合する名称リストの読み込み

use crate::error::{MapperError, Result};
use serde::Deserialize;
use std::path::Path;

/// 照合APIのリクエスト形式
#[derive(Debug, Deserialize)]
pub struct TariffRequest {
    pub tariff_names: Vec<String>,
}

/// 名称ファイルを読み込む
///
/// - `.json`: `{"tariff_names": [...]}` または文字列の配列
/// - それ以外: 1行1件（空行は無視）
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(MapperError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        parse_json_names(&content)
    } else {
        Ok(parse_lines(&content))
    }
}

fn parse_json_names(content: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        let request: TariffRequest = serde_json::from_value(value)?;
        Ok(request.tariff_names)
    }
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_skips_blank() {
        let names = parse_lines("Paracetamol 500 MG\n\n  \nIbuprofen\r\n");
        assert_eq!(names, vec!["Paracetamol 500 MG", "Ibuprofen"]);
    }

    #[test]
    fn test_parse_json_request() {
        let names = parse_json_names(r#"{"tariff_names": ["A", "B"]}"#).unwrap();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_json_array() {
        let names = parse_json_names(r#"["A"]"#).unwrap();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_parse_json_invalid() {
        let result = parse_json_names(r#"{"names": []}"#);
        assert!(matches!(result, Err(MapperError::JsonParse(_))));
    }
}
