//! localrag-core
//!
//! Shared data model, error taxonomy, configuration and the corpus chunker.
#![deny(unused_imports)]
#![deny(unused_variables)]

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use chunker::Chunker;
pub use error::{Error, Result};
pub use types::{Chunk, QueryResult, RetrievalHit, SourceEntry};
