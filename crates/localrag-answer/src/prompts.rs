use localrag_core::types::RetrievalHit;

// Contract with the service:
// - answer ONLY from the supplied context
// - cite inline as [doc#chunk]
// - say so when the context lacks the answer
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Answer using ONLY the provided context. \
Cite sources inline like [doc#chunk]. If information is missing, say so.";

/// Labeled context blocks for the first `max_blocks` hits, blank-line separated.
pub fn context_blocks(hits: &[RetrievalHit], max_blocks: usize) -> String {
    hits.iter()
        .take(max_blocks)
        .map(|hit| format!("{}\n{}", hit.chunk.citation(), hit.chunk.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn user_message(query: &str, context: &str) -> String {
    format!("Question: {query}\n\nContext:\n{context}")
}
