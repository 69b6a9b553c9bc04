//! Domain types shared by the chunker, the lexical index and the answerers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept in a source preview.
pub const PREVIEW_CHARS: usize = 160;

/// A window of normalized document text, the unit of retrieval.
///
/// - `document_id`: file name of the source document
/// - `chunk_index`: 0-based position of the window within its document
/// - `text`: the window contents
///
/// `(document_id, chunk_index)` is unique within a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub document_id: String,
    pub chunk_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(document_id: impl Into<String>, chunk_index: usize, text: impl Into<String>) -> Self {
        Self { document_id: document_id.into(), chunk_index, text: text.into() }
    }

    /// Inline citation label, e.g. `[notes.txt#3]`.
    pub fn citation(&self) -> String {
        format!("[{}#{}]", self.document_id, self.chunk_index)
    }

    pub fn preview(&self) -> String {
        self.text.chars().take(PREVIEW_CHARS).collect()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document_id, self.chunk_index)
    }
}

/// A chunk paired with its cosine similarity to the query.
///
/// Produced by the lexical index and consumed within a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalHit {
    pub chunk: Chunk,
    pub score: f64,
}

impl RetrievalHit {
    pub fn new(chunk: Chunk, score: f64) -> Self {
        Self { chunk, score }
    }
}

/// One entry of the source list attached to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub doc: String,
    pub chunk: usize,
    pub score: f64,
    pub preview: String,
}

impl From<&RetrievalHit> for SourceEntry {
    fn from(hit: &RetrievalHit) -> Self {
        Self {
            doc: hit.chunk.document_id.clone(),
            chunk: hit.chunk.chunk_index,
            score: hit.score,
            preview: hit.chunk.preview(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<SourceEntry>,
}
