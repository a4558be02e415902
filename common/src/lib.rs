//! SNOMED Mapper Common Library
//!
//! 料金表の名称をSNOMED参照マスタに照合するコア処理。
//! CLIと外部リクエスト層（HTTPなど）で共有される。
//!
//! ## 処理フロー
//! 1. 参照マスタから `ReferenceIndex` を構築（起動時に1回）
//! 2. 名称を正規化・TF-IDFベクトル化
//! 3. コサイン類似度で最良一致を選択
//! 4. コード・説明を付けて結果を組み立て

pub mod types;
pub mod error;
pub mod normalizer;
pub mod vocabulary;
pub mod vector;
pub mod index;
pub mod search;
pub mod assembler;
pub mod table;
pub mod reference;
pub mod ingest;
pub mod matcher;
pub mod export;

pub use types::{CellValue, MatchResult, MatchedTariffRecord, ReferenceEntry, TariffRecord};
pub use error::{Error, Result};
pub use normalizer::normalize;
pub use vocabulary::TermVocabulary;
pub use vector::{vectorize, SparseVector};
pub use index::ReferenceIndex;
pub use search::{best_match, best_matches};
pub use table::{Sheet, SheetSource, TabularDocument};
pub use reference::load_reference;
pub use ingest::{ingest, IngestOptions, IngestOutcome, SkipReason, SkippedSheet};
pub use matcher::{ingest_and_match, match_batch, BulkMatchReport};
