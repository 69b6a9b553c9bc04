//! localrag-pipeline
//!
//! Wires the chunker, a retriever and the answer synthesizer into a
//! `build` + `query` facade.
use std::path::{Path, PathBuf};

use tracing::info;

use localrag_answer::AnswerSynthesizer;
use localrag_core::chunker::Chunker;
use localrag_core::config::RagConfig;
use localrag_core::error::{Error, Result};
use localrag_core::traits::{Retriever, Synthesizer};
use localrag_core::types::{QueryResult, SourceEntry};
use localrag_text::{LexicalIndex, VectorizerConfig};

pub struct RagPipeline<R = LexicalIndex>
where
    R: Retriever,
{
    data_dir: PathBuf,
    chunker: Chunker,
    retriever: R,
    synthesizer: AnswerSynthesizer,
}

impl RagPipeline<LexicalIndex> {
    /// Assemble a pipeline over `data_dir`. The synthesizer variant is chosen
    /// here, once; a missing API key for the delegated variant fails now.
    pub fn new(data_dir: impl Into<PathBuf>, config: &RagConfig) -> Result<Self> {
        config.validate()?;
        let index = LexicalIndex::with_config(VectorizerConfig { max_df: config.retrieval.max_df, ..VectorizerConfig::default() });
        let synthesizer = AnswerSynthesizer::from_config(&config.answer)?;
        Ok(Self::from_parts(data_dir, Chunker::new(config.chunking.clone()), index, synthesizer))
    }

    /// Same as [`RagPipeline::new`] with the configured `data_dir`.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.data_path(), config)
    }
}

impl<R> RagPipeline<R>
where
    R: Retriever,
{
    pub fn from_parts(data_dir: impl Into<PathBuf>, chunker: Chunker, retriever: R, synthesizer: AnswerSynthesizer) -> Self {
        Self { data_dir: data_dir.into(), chunker, retriever, synthesizer }
    }

    pub fn data_dir(&self) -> &Path { &self.data_dir }

    /// Load and chunk the corpus, then (re)build the retriever.
    pub fn build(&mut self) -> Result<()> {
        let chunks = match self.chunker.load(&self.data_dir) {
            Ok(chunks) => chunks,
            Err(Error::NotFound(_)) => return Err(Error::EmptyCorpus(self.data_dir.clone())),
            Err(e) => return Err(e),
        };
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus(self.data_dir.clone()));
        }
        let count = chunks.len();
        self.retriever.build(chunks)?;
        info!(chunks = count, dir = %self.data_dir.display(), "pipeline built");
        Ok(())
    }

    pub fn query(&self, question: &str, k: usize) -> Result<QueryResult> {
        let hits = self.retriever.search(question, k)?;
        let answer = self.synthesizer.answer(question, &hits)?;
        let sources = hits.iter().map(SourceEntry::from).collect();
        Ok(QueryResult { answer, sources })
    }
}
