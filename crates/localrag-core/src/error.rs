use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No chunks could be produced from {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("Index is not searchable: call build() first and ask for at least one hit")]
    NotBuilt,

    #[error("After pruning, no terms remain; the corpus needs more distinct chunks")]
    EmptyVocabulary,

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
