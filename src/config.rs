use crate::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use snomed_mapper_common::IngestOptions;
use std::path::{Path, PathBuf};

/// 参照マスタのパスを指定する環境変数
pub const REFERENCE_ENV: &str = "SNOMED_MAPPER_REFERENCE";

/// 参照マスタの既定パス（カレントディレクトリ）
pub const DEFAULT_REFERENCE_FILE: &str = "reference_map.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference_path: Option<PathBuf>,
    pub summary_sheet: String,
    pub tariff_name_column: String,
    pub price_column: String,
    /// 一括照合を並列実行する
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        let ingest = IngestOptions::default();
        Self {
            reference_path: None,
            summary_sheet: ingest.summary_sheet,
            tariff_name_column: ingest.name_column,
            price_column: ingest.price_column,
            parallel: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MapperError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("snomed-mapper").join("config.json"))
    }

    /// 参照マスタのパスを決定する
    ///
    /// 優先順: 引数 → 環境変数 → 設定ファイル → 既定値
    pub fn resolve_reference(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(REFERENCE_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        self.reference_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_FILE))
    }

    pub fn set_reference_path(&mut self, path: PathBuf) -> Result<()> {
        self.reference_path = Some(path);
        self.save()
    }

    /// 取り込みオプションに変換
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            summary_sheet: self.summary_sheet.clone(),
            name_column: self.tariff_name_column.clone(),
            price_column: self.price_column.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_ingest_defaults() {
        let config = Config::default();
        assert_eq!(config.summary_sheet, "SUMMARY");
        assert_eq!(config.tariff_name_column, "TARIFF NAME");
        assert_eq!(config.price_column, "PRICE");
        assert!(config.parallel);
    }

    #[test]
    fn test_explicit_reference_wins() {
        let config = Config {
            reference_path: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        let resolved = config.resolve_reference(Some(Path::new("explicit.xlsx")));
        assert_eq!(resolved, PathBuf::from("explicit.xlsx"));
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"price_column": "COST"}"#).unwrap();
        assert_eq!(config.price_column, "COST");
        assert_eq!(config.tariff_name_column, "TARIFF NAME");
        assert!(config.reference_path.is_none());
    }
}
