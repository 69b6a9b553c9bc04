use tracing::{debug, info};

use localrag_core::error::{Error, Result};
use localrag_core::traits::Retriever;
use localrag_core::types::{Chunk, RetrievalHit};

use crate::similarity::{cosine_similarity, SparseVector};
use crate::vectorizer::{TfidfVectorizer, VectorizerConfig};

/// In-memory TF-IDF index over chunks.
///
/// Row `i` of the weight matrix belongs to `chunks[i]`. State is built in one
/// step and swapped in whole, so a failed rebuild keeps the previous index.
#[derive(Debug, Default)]
pub struct LexicalIndex {
    config: VectorizerConfig,
    state: Option<IndexState>,
}

#[derive(Debug)]
struct IndexState {
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
    chunks: Vec<Chunk>,
}

impl LexicalIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: VectorizerConfig) -> Self { Self { config, state: None } }

    pub fn build(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        let docs: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let (vectorizer, matrix) = TfidfVectorizer::fit(&self.config, &docs)?;
        info!(chunks = chunks.len(), vocabulary = vectorizer.vocabulary_len(), "lexical index built");
        self.state = Some(IndexState { vectorizer, matrix, chunks });
        Ok(())
    }

    /// Top `k` chunks by cosine similarity, best first. Equal scores keep
    /// chunk order. `k == 0` fails with [`Error::NotBuilt`] like an unbuilt
    /// index does.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>> {
        let state = self.state.as_ref().filter(|_| k > 0).ok_or(Error::NotBuilt)?;
        let query_vec = state.vectorizer.transform(query);
        debug!(query_terms = query_vec.len(), k, "lexical search");
        let mut scored: Vec<(usize, f64)> =
            state.matrix.iter().enumerate().map(|(i, row)| (i, cosine_similarity(&query_vec, row))).collect();
        // sort_by is stable
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored.into_iter().map(|(i, score)| RetrievalHit::new(state.chunks[i].clone(), score)).collect())
    }

    pub fn is_built(&self) -> bool { self.state.is_some() }

    pub fn len(&self) -> usize { self.state.as_ref().map_or(0, |s| s.chunks.len()) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Retriever for LexicalIndex {
    fn build(&mut self, chunks: Vec<Chunk>) -> Result<()> { Self::build(self, chunks) }
    fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>> { Self::search(self, query, k) }
}
