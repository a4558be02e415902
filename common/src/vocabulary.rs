//! 語彙（トークン→次元）とIDF重みの構築

use crate::error::{Error, Result};
use crate::normalizer::{normalize, tokenize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// 参照コーパスから構築した語彙
///
/// 構築後は変更しない。次元番号はトークンの辞書順で振る。
#[derive(Debug, Clone)]
pub struct TermVocabulary {
    terms: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl TermVocabulary {
    /// 参照名称の一覧から語彙を構築する
    ///
    /// IDF = ln((1 + N) / (1 + df)) + 1
    /// 全文書に出現するトークンも重み1以上を持つ。
    pub fn fit<S: AsRef<str>>(corpus_names: &[S]) -> Result<Self> {
        if corpus_names.is_empty() {
            return Err(Error::Vocabulary("reference corpus is empty".into()));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for name in corpus_names {
            let normalized = normalize(name.as_ref());
            // 1文書内の重複は1回と数える
            let distinct: HashSet<&str> = tokenize(&normalized).collect();
            for token in distinct {
                *document_frequency.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(Error::Vocabulary(
                "reference corpus contains no extractable tokens".into(),
            ));
        }

        let ordered: BTreeSet<&String> = document_frequency.keys().collect();
        let n = corpus_names.len() as f64;

        let mut terms = HashMap::with_capacity(ordered.len());
        let mut idf = Vec::with_capacity(ordered.len());
        for (index, term) in ordered.into_iter().enumerate() {
            let df = document_frequency[term] as f64;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            terms.insert(term.clone(), index);
        }

        Ok(Self {
            terms,
            idf,
            documents: corpus_names.len(),
        })
    }

    /// トークンの次元番号
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    /// 次元番号のIDF重み
    pub fn idf(&self, index: usize) -> f64 {
        self.idf[index]
    }

    /// トークンのIDF重み（語彙外は None）
    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|i| self.idf[i])
    }

    /// 語彙数
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// 構築に使った文書数
    pub fn documents(&self) -> usize {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_assigns_sorted_indices() {
        let vocab = TermVocabulary::fit(&["paracetamol 500mg", "ibuprofen 200mg"]).unwrap();
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.index_of("200"), Some(0));
        assert_eq!(vocab.index_of("500"), Some(1));
        assert_eq!(vocab.index_of("ibuprofen"), Some(2));
        assert_eq!(vocab.index_of("mg"), Some(3));
        assert_eq!(vocab.index_of("paracetamol"), Some(4));
        assert_eq!(vocab.index_of("aspirin"), None);
        assert_eq!(vocab.documents(), 2);
    }

    #[test]
    fn test_idf_smoothing() {
        let vocab = TermVocabulary::fit(&["paracetamol 500mg", "ibuprofen 200mg"]).unwrap();
        // 全文書に出現: ln(3/3) + 1 = 1
        assert!((vocab.idf_of("mg").unwrap() - 1.0).abs() < 1e-12);
        // 1文書のみ: ln(3/2) + 1
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vocab.idf_of("paracetamol").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fit_counts_document_frequency_once_per_name() {
        let vocab = TermVocabulary::fit(&["mg mg mg", "tablet"]).unwrap();
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vocab.idf_of("mg").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fit_normalizes_case() {
        let vocab = TermVocabulary::fit(&["X-RAY Chest"]).unwrap();
        assert!(vocab.index_of("ray").is_some());
        assert!(vocab.index_of("RAY").is_none());
    }

    #[test]
    fn test_fit_empty_corpus() {
        let names: Vec<String> = Vec::new();
        let err = TermVocabulary::fit(&names).unwrap_err();
        assert!(matches!(err, Error::Vocabulary(_)));
    }

    #[test]
    fn test_fit_no_tokens() {
        let err = TermVocabulary::fit(&["!!!", " - "]).unwrap_err();
        assert!(matches!(err, Error::Vocabulary(_)));
    }
}
