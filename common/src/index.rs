//! 参照インデックス
//!
//! 語彙・参照ベクトル・参照エントリをまとめた不変オブジェクト。
//! 起動時に1度だけ構築し、以降は全リクエストから読み取り専用で共有する。

use crate::error::Result;
use crate::types::ReferenceEntry;
use crate::vector::{vectorize, SparseVector};
use crate::vocabulary::TermVocabulary;
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    vocabulary: TermVocabulary,
    vectors: Vec<SparseVector>,
    entries: Vec<ReferenceEntry>,
}

impl ReferenceIndex {
    /// 参照エントリから語彙とベクトルを構築する
    ///
    /// `entries` の順序がそのまま位置（タイブレーク順）になる。
    pub fn build(entries: Vec<ReferenceEntry>) -> Result<Self> {
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let vocabulary = TermVocabulary::fit(&names)?;

        let vectors: Vec<SparseVector> = entries
            .par_iter()
            .map(|entry| vectorize(&entry.name, &vocabulary))
            .collect();

        info!(
            entries = entries.len(),
            terms = vocabulary.len(),
            "reference index built"
        );

        Ok(Self {
            vocabulary,
            vectors,
            entries,
        })
    }

    /// クエリ文字列を固定語彙でベクトル化
    pub fn vectorize(&self, name: &str) -> SparseVector {
        vectorize(name, &self.vocabulary)
    }

    pub fn vocabulary(&self) -> &TermVocabulary {
        &self.vocabulary
    }

    /// 参照ベクトル（entries と同じ並び）
    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn entry(&self, position: usize) -> Option<&ReferenceEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
