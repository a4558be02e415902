//! Excel出力（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを生成してファイルに書き出す

use crate::error::{MapperError, Result};
use snomed_mapper_common::export::excel_core;
use snomed_mapper_common::{BulkMatchReport, MatchResult};
use std::path::Path;

pub fn write_match_results(results: &[MatchResult], output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_match_workbook(results).map_err(MapperError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}

pub fn write_bulk_report(report: &BulkMatchReport, output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_bulk_workbook(report).map_err(MapperError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
