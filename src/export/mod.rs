pub mod excel;

use crate::error::{MapperError, Result};
use serde::Serialize;
use snomed_mapper_common::{BulkMatchReport, MatchResult};
use std::path::Path;

/// 出力形式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Excel,
}

impl OutputFormat {
    /// 拡張子から判定
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(OutputFormat::Json),
            "xlsx" => Ok(OutputFormat::Excel),
            _ => Err(MapperError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use json or excel", s)),
        }
    }
}

/// 照合APIと同じレスポンス形式
#[derive(Serialize)]
pub struct MatchResponse<'a> {
    pub results: &'a [MatchResult],
}

fn resolve_format(output: &Path, format: Option<OutputFormat>) -> Result<OutputFormat> {
    match format {
        Some(format) => Ok(format),
        None => OutputFormat::from_path(output),
    }
}

/// 名称リストの照合結果を書き出す
pub fn export_match_results(
    results: &[MatchResult],
    output: &Path,
    format: Option<OutputFormat>,
) -> Result<()> {
    match resolve_format(output, format)? {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&MatchResponse { results })?;
            std::fs::write(output, json)?;
        }
        OutputFormat::Excel => excel::write_match_results(results, output)?,
    }
    Ok(())
}

/// 一括照合の結果を書き出す
pub fn export_bulk_report(
    report: &BulkMatchReport,
    output: &Path,
    format: Option<OutputFormat>,
) -> Result<()> {
    match resolve_format(output, format)? {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)?;
            std::fs::write(output, json)?;
        }
        OutputFormat::Excel => excel::write_bulk_report(report, output)?,
    }
    Ok(())
}
