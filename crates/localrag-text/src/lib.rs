//! localrag-text
//!
//! Lexical retrieval: tantivy-based word analysis, TF-IDF weighting over
//! unigrams and bigrams, and cosine-ranked search over chunks.
pub mod analysis;
pub mod index;
pub mod similarity;
pub mod vectorizer;

pub use analysis::{word_set, Analyzer};
pub use index::LexicalIndex;
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};
