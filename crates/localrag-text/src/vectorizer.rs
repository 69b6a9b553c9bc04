//! TF-IDF term weighting over word n-grams.
//!
//! Weights follow the usual smoothed formulation: raw term counts,
//! `idf = ln((1 + n) / (1 + df)) + 1`, and L2-normalized rows. Terms seen in
//! fewer than `min_df` chunks or in more than `max_df * n` chunks are pruned
//! from the vocabulary at fit time.
use std::collections::{BTreeMap, HashMap};

use localrag_core::error::{Error, Result};

use crate::analysis::Analyzer;
use crate::similarity::{normalize, SparseVector};

#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    /// Inclusive `(min_n, max_n)` n-gram range.
    pub ngram_range: (usize, usize),
    pub min_df: usize,
    /// Proportion of chunks; terms above it are dropped.
    pub max_df: f64,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { ngram_range: (1, 2), min_df: 1, max_df: 0.9 }
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    analyzer: Analyzer,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from `docs` and return the fitted
    /// model together with one weighted row per document.
    pub fn fit(config: &VectorizerConfig, docs: &[&str]) -> Result<(Self, Vec<SparseVector>)> {
        let analyzer = Analyzer::for_terms()?;
        let ngram_range = (config.ngram_range.0.max(1), config.ngram_range.1.max(config.ngram_range.0.max(1)));
        let counts: Vec<HashMap<String, u32>> =
            docs.iter().map(|d| count_terms(&ngrams(&analyzer.tokens(d), ngram_range))).collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_default() += 1;
            }
        }

        let n_docs = docs.len();
        let max_doc_count = config.max_df * n_docs as f64;
        let mut vocabulary = HashMap::new();
        let mut idf = Vec::new();
        // BTreeMap iteration gives ids in sorted term order.
        for (term, freq) in df {
            if freq < config.min_df || (freq as f64) > max_doc_count {
                continue;
            }
            vocabulary.insert(term.to_string(), idf.len());
            idf.push(((1.0 + n_docs as f64) / (1.0 + freq as f64)).ln() + 1.0);
        }
        if vocabulary.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let model = Self { analyzer, ngram_range, vocabulary, idf };
        let rows = counts.iter().map(|c| model.weigh(c)).collect();
        Ok((model, rows))
    }

    /// Project `text` into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let counts = count_terms(&ngrams(&self.analyzer.tokens(text), self.ngram_range));
        self.weigh(&counts)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_id(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_id(term).map(|id| self.idf[id])
    }

    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVector {
        let mut row: SparseVector = counts
            .iter()
            .filter_map(|(term, &tf)| self.vocabulary.get(term).map(|&id| (id, f64::from(tf) * self.idf[id])))
            .collect();
        row.sort_unstable_by_key(|&(id, _)| id);
        normalize(&mut row);
        row
    }
}

/// Word n-grams for every `n` in `range`, unigrams first; multi-word terms
/// are space-joined.
pub fn ngrams(tokens: &[String], range: (usize, usize)) -> Vec<String> {
    let (min_n, max_n) = range;
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n == 0 || n > tokens.len() {
            continue;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

fn count_terms(terms: &[String]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::l2_norm;

    #[test]
    fn ngrams_emit_unigrams_then_bigrams() {
        let tokens: Vec<String> = ["a1", "b2", "c3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ngrams(&tokens, (1, 2)), vec!["a1", "b2", "c3", "a1 b2", "b2 c3"]);
        assert!(ngrams(&tokens[..1], (2, 2)).is_empty());
    }

    #[test]
    fn terms_in_most_chunks_are_pruned() {
        let docs = ["common alpha", "common beta", "common gamma"];
        let (model, rows) = TfidfVectorizer::fit(&VectorizerConfig::default(), &docs).expect("fit");
        assert_eq!(model.term_id("common"), None);
        assert!(model.term_id("common alpha").is_some());
        assert_eq!(model.vocabulary_len(), 6);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn idf_is_smoothed() {
        let docs = ["apple banana", "apple cherry", "kiwi"];
        let (model, _) = TfidfVectorizer::fit(&VectorizerConfig::default(), &docs).expect("fit");
        let expected = (4.0f64 / 3.0).ln() + 1.0;
        assert!((model.idf("apple").expect("apple kept") - expected).abs() < 1e-6);
        let expected = (4.0f64 / 2.0).ln() + 1.0;
        assert!((model.idf("kiwi").expect("kiwi kept") - expected).abs() < 1e-6);
    }

    #[test]
    fn rows_and_queries_are_unit_length() {
        let docs = ["red fox jumps", "lazy brown dog", "red dog sleeps"];
        let (model, rows) = TfidfVectorizer::fit(&VectorizerConfig::default(), &docs).expect("fit");
        for row in &rows {
            assert!((l2_norm(row) - 1.0).abs() < 1e-5);
        }
        assert!((l2_norm(&model.transform("red dog")) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn identifiers_are_single_terms() {
        let docs = ["read user_id first", "then write user_name", "plain words only"];
        let (model, _) = TfidfVectorizer::fit(&VectorizerConfig::default(), &docs).expect("fit");
        assert!(model.term_id("user_id").is_some());
        assert!(model.term_id("read user_id").is_some());
        assert_eq!(model.term_id("user"), None);
        assert_eq!(model.term_id("id"), None);
    }

    #[test]
    fn unknown_query_terms_give_zero_vector() {
        let (model, _) = TfidfVectorizer::fit(&VectorizerConfig::default(), &["alpha beta", "gamma delta"]).expect("fit");
        assert!(model.transform("zeta omega").is_empty());
    }

    #[test]
    fn single_document_prunes_everything() {
        let err = TfidfVectorizer::fit(&VectorizerConfig::default(), &["only one chunk"]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary));
        let err = TfidfVectorizer::fit(&VectorizerConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary));
    }
}
