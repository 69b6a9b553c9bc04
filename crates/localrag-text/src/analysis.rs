use std::collections::HashSet;

use tantivy::tokenizer::{LowerCaser, RegexTokenizer, TextAnalyzer, TokenStream};

use localrag_core::error::{Error, Result};

/// Unicode word characters, underscore included.
pub const WORD_PATTERN: &str = r"\w+";

/// Lowercasing word analyzer: tokens are maximal runs of word characters.
pub fn build_analyzer() -> Result<TextAnalyzer> {
    let tokenizer = RegexTokenizer::new(WORD_PATTERN)
        .map_err(|e| Error::InvalidConfig(format!("invalid word pattern {WORD_PATTERN:?}: {e}")))?;
    Ok(TextAnalyzer::builder(tokenizer).filter(LowerCaser).build())
}

#[derive(Clone)]
pub struct Analyzer {
    inner: TextAnalyzer,
    min_token_chars: usize,
}

impl Analyzer {
    /// Analyzer used for term weighting; single-character tokens are dropped.
    pub fn for_terms() -> Result<Self> { Ok(Self { inner: build_analyzer()?, min_token_chars: 2 }) }

    /// Analyzer that keeps every word, including one-letter ones.
    pub fn for_words() -> Result<Self> { Ok(Self { inner: build_analyzer()?, min_token_chars: 1 }) }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.inner.clone();
        let mut stream = analyzer.token_stream(text);
        let mut out = Vec::new();
        while stream.advance() {
            let token = &stream.token().text;
            if token.chars().count() >= self.min_token_chars {
                out.push(token.clone());
            }
        }
        out
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").field("min_token_chars", &self.min_token_chars).finish()
    }
}

/// Distinct lowercase words of `text`.
pub fn word_set(text: &str) -> Result<HashSet<String>> {
    Ok(Analyzer::for_words()?.tokens(text).into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_tokens_are_lowercased_and_skip_single_chars() {
        let tokens = Analyzer::for_terms().expect("analyzer").tokens("TF-IDF is a Classic method!");
        assert_eq!(tokens, vec!["tf", "idf", "is", "classic", "method"]);
    }

    #[test]
    fn snake_case_identifiers_stay_whole() {
        let tokens = Analyzer::for_terms().expect("analyzer").tokens("Set user_id and MAX_RETRIES=3 now");
        assert_eq!(tokens, vec!["set", "user_id", "and", "max_retries", "now"]);
        let words = word_set("user_id").expect("words");
        assert_eq!(words, HashSet::from(["user_id".to_string()]));
    }

    #[test]
    fn accented_letters_are_word_characters() {
        let tokens = Analyzer::for_words().expect("analyzer").tokens("Café Ünïcode");
        assert_eq!(tokens, vec!["café", "ünïcode"]);
    }

    #[test]
    fn word_set_keeps_short_words() {
        let words = word_set("What does RAG do? A lot.").expect("words");
        for w in ["what", "does", "rag", "do", "a", "lot"] {
            assert!(words.contains(w), "missing {w}");
        }
        assert_eq!(words.len(), 6);
    }
}
