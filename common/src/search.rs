//! 類似度検索
//!
//! 参照ベクトル全件とのコサイン類似度を線形走査で計算し、最大値の位置を返す。
//! 同点の場合は最も小さい位置（コーパス順で最初）を採用する。

use crate::index::ReferenceIndex;
use crate::vector::SparseVector;
use rayon::prelude::*;

/// 最良一致（位置, スコア）
///
/// クエリがゼロベクトルの場合は全件スコア0となり、位置0が返る。
pub fn best_match(query: &SparseVector, index: &ReferenceIndex) -> (usize, f64) {
    let mut best = (0, 0.0);
    let mut found = false;

    for (position, reference) in index.vectors().iter().enumerate() {
        let score = query.dot(reference);
        // 厳密に大きい場合のみ更新（先勝ち）
        if !found || score > best.1 {
            best = (position, score);
            found = true;
        }
    }

    (best.0, best.1.clamp(0.0, 1.0))
}

/// 複数クエリの最良一致
///
/// 行ごとに独立して計算する。出力順は入力順と同じ。
pub fn best_matches(queries: &[SparseVector], index: &ReferenceIndex) -> Vec<(usize, f64)> {
    queries
        .par_iter()
        .map(|query| best_match(query, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, ReferenceEntry};

    fn entry(name: &str, code: f64) -> ReferenceEntry {
        ReferenceEntry::new(name, CellValue::Number(code), CellValue::text(name))
    }

    fn index() -> ReferenceIndex {
        ReferenceIndex::build(vec![
            entry("paracetamol 500mg", 10001.0),
            entry("ibuprofen 200mg", 10002.0),
            entry("full blood count", 10003.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_best_match_exact() {
        let index = index();
        let (position, score) = best_match(&index.vectorize("Ibuprofen 200 mg"), &index);
        assert_eq!(position, 1);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_match_partial() {
        let index = index();
        let (position, score) = best_match(&index.vectorize("blood count"), &index);
        assert_eq!(position, 2);
        assert!(score > 0.5 && score < 1.0);
    }

    #[test]
    fn test_zero_vector_matches_first_entry() {
        let index = index();
        let (position, score) = best_match(&index.vectorize("!!!"), &index);
        assert_eq!(position, 0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_tie_break_prefers_lowest_position() {
        // 同一ベクトルになるエントリ（語順違い）
        let index = ReferenceIndex::build(vec![
            entry("chest x ray", 1.0),
            entry("x ray chest", 2.0),
            entry("ray chest x", 3.0),
        ])
        .unwrap();
        assert_eq!(index.vectors()[0], index.vectors()[1]);

        let (position, _) = best_match(&index.vectorize("chest ray x"), &index);
        assert_eq!(position, 0);
    }

    #[test]
    fn test_best_matches_preserves_order() {
        let index = index();
        let queries: Vec<SparseVector> = ["full blood count", "paracetamol", "ibuprofen", "???"]
            .iter()
            .map(|q| index.vectorize(q))
            .collect();

        let matches = best_matches(&queries, &index);
        let positions: Vec<usize> = matches.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![2, 0, 1, 0]);
        assert_eq!(matches[3].1, 0.0);
    }

    #[test]
    fn test_best_matches_deterministic() {
        let index = index();
        let queries: Vec<SparseVector> = ["paracetamol 200mg", "blood"]
            .iter()
            .map(|q| index.vectorize(q))
            .collect();
        assert_eq!(best_matches(&queries, &index), best_matches(&queries, &index));
    }
}
