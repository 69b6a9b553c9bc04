//! Offline answering by quoting retrieved sentences.
//!
//! The top chunks are concatenated into a bounded context, split into
//! sentences, and every sentence sharing enough words with the question is
//! quoted with an inline `[doc#chunk]` citation. Accuracy is bounded by
//! lexical overlap.
use localrag_core::error::Result;
use localrag_core::traits::Synthesizer;
use localrag_core::types::{Chunk, RetrievalHit};
use localrag_text::word_set;

use crate::sentences::{attribute, split_sentences};

pub const NO_RESULTS_MESSAGE: &str = "I couldn't find anything relevant in the local corpus.";
pub const ANSWER_HEADER: &str = "Answer (offline):";
pub const ANSWER_FOOTER: &str = "(This answer was composed from retrieved local text with citations.)";
pub const MAX_SENTENCES: usize = 5;
/// Share of query terms a sentence must contain to be quoted.
pub const MIN_OVERLAP_RATIO: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct ExtractiveSynthesizer {
    max_context_chars: usize,
}

impl Default for ExtractiveSynthesizer {
    fn default() -> Self { Self { max_context_chars: 2000 } }
}

impl ExtractiveSynthesizer {
    pub fn new(max_context_chars: usize) -> Self { Self { max_context_chars } }

    pub fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String> {
        let Some(top) = hits.first() else {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        };
        let (context, chosen) = self.assemble_context(hits);

        let terms = word_set(query)?;
        let threshold = min_overlap(terms.len());
        let mut picked: Vec<(String, &Chunk)> = Vec::new();
        for sentence in split_sentences(&context) {
            let overlap = word_set(&sentence)?.intersection(&terms).count();
            if overlap < threshold {
                continue;
            }
            if let Some(chunk) = attribute(&sentence, &chosen) {
                picked.push((sentence.trim().to_string(), chunk));
            }
        }

        if picked.is_empty() {
            let text = top.chunk.text.trim();
            let first = split_sentences(text).into_iter().next().unwrap_or_else(|| text.to_string());
            picked.push((first, &top.chunk));
        }

        let lines: Vec<String> = picked
            .iter()
            .take(MAX_SENTENCES)
            .map(|(sentence, chunk)| format!("- {} {}", sentence, chunk.citation()))
            .collect();
        Ok(format!("{ANSWER_HEADER}\n{}\n\n{ANSWER_FOOTER}", lines.join("\n")))
    }

    /// Join whole chunk texts with newlines until the next one would push the
    /// buffer past the budget.
    fn assemble_context<'a>(&self, hits: &'a [RetrievalHit]) -> (String, Vec<&'a Chunk>) {
        let mut context = String::new();
        let mut context_chars = 0usize;
        let mut chosen = Vec::new();
        for hit in hits {
            let snippet = hit.chunk.text.trim();
            let snippet_chars = snippet.chars().count();
            if context_chars + snippet_chars + 1 > self.max_context_chars {
                break;
            }
            if !context.is_empty() {
                context.push('\n');
                context_chars += 1;
            }
            context.push_str(snippet);
            context_chars += snippet_chars;
            chosen.push(&hit.chunk);
        }
        (context, chosen)
    }
}

/// `max(1, round(0.2 * n_terms))`.
pub fn min_overlap(n_terms: usize) -> usize {
    ((MIN_OVERLAP_RATIO * n_terms as f64).round() as usize).max(1)
}

impl Synthesizer for ExtractiveSynthesizer {
    fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String> { Self::answer(self, query, hits) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_threshold_has_floor_of_one() {
        assert_eq!(min_overlap(0), 1);
        assert_eq!(min_overlap(4), 1);
        assert_eq!(min_overlap(8), 2);
        assert_eq!(min_overlap(13), 3);
    }

    #[test]
    fn context_keeps_whole_chunks_within_budget() {
        let hits = vec![
            RetrievalHit::new(Chunk::new("a.txt", 0, "x".repeat(10)), 0.9),
            RetrievalHit::new(Chunk::new("a.txt", 1, "y".repeat(10)), 0.8),
            RetrievalHit::new(Chunk::new("b.txt", 0, "z".repeat(2)), 0.7),
        ];
        let (context, chosen) = ExtractiveSynthesizer::new(21).assemble_context(&hits);
        assert_eq!(context, format!("{}\n{}", "x".repeat(10), "y".repeat(10)));
        assert_eq!(chosen.len(), 2);

        let (context, chosen) = ExtractiveSynthesizer::new(20).assemble_context(&hits);
        assert_eq!(context, "x".repeat(10));
        assert_eq!(chosen.len(), 1, "stops at the first chunk that overflows");
    }
}
