//! 照合処理
//!
//! 外部のリクエスト層から呼ばれる操作:
//! - `match_batch`: 名称リストを一括照合
//! - `ingest_and_match`: 表データを取り込んで全行を照合
//!
//! どちらも参照インデックスを読むだけで、共有状態は変更しない。

use crate::assembler::assemble;
use crate::error::{Error, Result};
use crate::index::ReferenceIndex;
use crate::ingest::{ingest, IngestOptions, SkippedSheet};
use crate::search::best_matches;
use crate::table::SheetSource;
use crate::types::{MatchResult, MatchedTariffRecord};
use crate::vector::SparseVector;
use rayon::prelude::*;
use serde::Serialize;

/// 名称リストを照合する
///
/// 出力は入力と同じ件数・同じ順序。空リストは `Validation` エラー。
pub fn match_batch<S: AsRef<str> + Sync>(names: &[S], index: &ReferenceIndex) -> Result<Vec<MatchResult>> {
    if names.is_empty() {
        return Err(Error::Validation("tariff_names list cannot be empty.".into()));
    }

    let queries: Vec<SparseVector> = names
        .par_iter()
        .map(|name| index.vectorize(name.as_ref()))
        .collect();

    let results = best_matches(&queries, index)
        .into_iter()
        .zip(names)
        .map(|((position, score), name)| assemble(name.as_ref(), position, score, index))
        .collect();

    Ok(results)
}

/// 一括照合の結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkMatchReport {
    pub records: Vec<MatchedTariffRecord>,
    pub total_rows: usize,
    pub duplicated_rows: usize,
    pub skipped_sheets: Vec<SkippedSheet>,
}

/// 表データを取り込み、全レコードを照合する
///
/// 元の表は変更せず、照合結果を付加した新しいレコード列を返す。
pub fn ingest_and_match<S: SheetSource>(
    source: &mut S,
    index: &ReferenceIndex,
    options: &IngestOptions,
) -> Result<BulkMatchReport> {
    let outcome = ingest(source, options)?;

    let queries: Vec<SparseVector> = outcome
        .records
        .par_iter()
        .map(|record| index.vectorize(&record.name))
        .collect();
    let matches = best_matches(&queries, index);

    let records = outcome
        .records
        .into_iter()
        .zip(outcome.duplicate_flags)
        .zip(matches)
        .map(|((record, duplicate), (position, score))| {
            let matched = assemble(&record.name, position, score, index);
            MatchedTariffRecord {
                record,
                duplicate,
                matched,
            }
        })
        .collect();

    Ok(BulkMatchReport {
        records,
        total_rows: outcome.total_rows,
        duplicated_rows: outcome.duplicated_rows,
        skipped_sheets: outcome.skipped_sheets,
    })
}
