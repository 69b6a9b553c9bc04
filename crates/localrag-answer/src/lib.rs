//! localrag-answer
//!
//! Answer synthesis over retrieved chunks. Two strategies share the
//! [`Synthesizer`] capability: offline sentence extraction and delegation to a
//! chat-completion service. The strategy is fixed when the synthesizer is
//! constructed.
pub mod delegated;
pub mod extractive;
pub mod prompts;
pub mod sentences;

use localrag_core::config::{AnswerConfig, Provider};
use localrag_core::error::Result;
use localrag_core::traits::Synthesizer;
use localrag_core::types::RetrievalHit;

pub use delegated::DelegatedSynthesizer;
pub use extractive::ExtractiveSynthesizer;

#[derive(Debug)]
pub enum AnswerSynthesizer {
    Extractive(ExtractiveSynthesizer),
    Delegated(DelegatedSynthesizer),
}

impl AnswerSynthesizer {
    /// Pick the strategy named by `config.provider`. The delegated variant
    /// reads its key now and fails with `InvalidConfig` when it is absent.
    pub fn from_config(config: &AnswerConfig) -> Result<Self> {
        match config.provider {
            Provider::Offline => Ok(Self::Extractive(ExtractiveSynthesizer::new(config.max_context_chars))),
            Provider::OpenAi => Ok(Self::Delegated(DelegatedSynthesizer::from_env(config.delegated.clone())?)),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Extractive(_) => Provider::Offline,
            Self::Delegated(_) => Provider::OpenAi,
        }
    }
}

impl Synthesizer for AnswerSynthesizer {
    fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String> {
        match self {
            Self::Extractive(s) => s.answer(query, hits),
            Self::Delegated(s) => s.answer(query, hits),
        }
    }
}

impl From<ExtractiveSynthesizer> for AnswerSynthesizer {
    fn from(s: ExtractiveSynthesizer) -> Self { Self::Extractive(s) }
}

impl From<DelegatedSynthesizer> for AnswerSynthesizer {
    fn from(s: DelegatedSynthesizer) -> Self { Self::Delegated(s) }
}
