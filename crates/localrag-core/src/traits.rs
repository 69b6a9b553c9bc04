use crate::error::Result;
use crate::types::{Chunk, RetrievalHit};

/// A searchable index over chunks.
///
/// `build` replaces all index state; `search` is read-only so a built index
/// can be shared between readers.
pub trait Retriever: Send + Sync {
    fn build(&mut self, chunks: Vec<Chunk>) -> Result<()>;
    fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>>;
}

/// Turns a question and its ranked hits into a cited answer.
pub trait Synthesizer: Send + Sync {
    fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String>;
}
