use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error(transparent)]
    Common(#[from] snomed_mapper_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です: {0}（.json/.xlsx/.xlsm/.xls/.xlsb/.ods）")]
    UnsupportedFormat(String),

    #[error("ワークブック読み込みエラー: {0}")]
    Workbook(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapperError>;
