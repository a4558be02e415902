//! 疎ベクトルとTF-IDFベクトル化
//!
//! 次元番号の昇順に並んだ (index, value) の組で保持する。
//! 内積はマージ走査で計算する。

use crate::normalizer::{normalize, tokenize};
use crate::vocabulary::TermVocabulary;
use std::collections::BTreeMap;

/// L2正規化済みの疎ベクトル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// ゼロベクトル
    pub fn zero() -> Self {
        Self::default()
    }

    /// 非ゼロ要素数
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// (次元, 値) を昇順で返す
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// ユークリッドノルム
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// 内積
    ///
    /// 両方とも単位ベクトルならコサイン類似度に等しい。
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        sum
    }

    /// 重みをL2正規化して構築（全ゼロはゼロベクトルのまま）
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::zero();
        }
        let (indices, values) = weights
            .into_iter()
            .map(|(index, weight)| (index, weight / norm))
            .unzip();
        Self { indices, values }
    }
}

/// 名称をTF-IDFベクトルに変換する
///
/// 正規化 → トークン分割 → 出現回数 × IDF → L2正規化。
/// 語彙にないトークンは無視する。参照側・クエリ側で共通。
pub fn vectorize(name: &str, vocab: &TermVocabulary) -> SparseVector {
    let normalized = normalize(name);

    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for token in tokenize(&normalized) {
        if let Some(index) = vocab.index_of(token) {
            *counts.entry(index).or_insert(0.0) += 1.0;
        }
    }

    for (index, weight) in counts.iter_mut() {
        *weight *= vocab.idf(*index);
    }

    SparseVector::from_weights(counts)
}
