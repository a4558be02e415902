//! 参照マスタファイルの読み込み
//!
//! - `.json`: レコード形式または列形式
//! - ワークブック: 先頭シート（1行目がヘッダー）

use crate::error::{MapperError, Result};
use crate::workbook::{is_workbook_path, ExcelSource};
use snomed_mapper_common::{load_reference, ReferenceIndex, Sheet};
use std::path::Path;
use tracing::debug;

/// 参照マスタを表として読み込む
pub fn read_reference_sheet(path: &Path) -> Result<Sheet> {
    if !path.exists() {
        return Err(MapperError::FileNotFound(path.display().to_string()));
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    debug!(path = %path.display(), "reading reference file");
    if is_json {
        let content = std::fs::read_to_string(path)?;
        Ok(Sheet::from_json_str("reference", &content)?)
    } else if is_workbook_path(path) {
        ExcelSource::open(path)?.first_sheet()
    } else {
        Err(MapperError::UnsupportedFormat(path.display().to_string()))
    }
}

/// 参照マスタファイルから参照インデックスを構築する
pub fn load_reference_file(path: &Path) -> Result<ReferenceIndex> {
    let sheet = read_reference_sheet(path)?;
    Ok(load_reference(&sheet)?)
}
