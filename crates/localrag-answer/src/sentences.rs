use localrag_core::types::Chunk;

/// Split `text` after `.`, `!` or `?` when followed by whitespace. The
/// whitespace run is consumed; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            push_piece(&mut out, &text[start..i]);
            let mut next_start = text.len();
            while let Some(&(j, next)) = chars.peek() {
                if next.is_whitespace() {
                    chars.next();
                } else {
                    next_start = j;
                    break;
                }
            }
            start = next_start;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    if start < text.len() {
        push_piece(&mut out, &text[start..]);
    }
    out
}

fn push_piece(out: &mut Vec<String>, piece: &str) {
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// First chunk whose text contains the trimmed sentence verbatim.
///
/// A sentence repeated in several chunks always goes to the earliest one.
pub fn attribute<'a>(sentence: &str, chunks: &[&'a Chunk]) -> Option<&'a Chunk> {
    let needle = sentence.trim();
    if needle.is_empty() {
        return None;
    }
    chunks.iter().copied().find(|c| c.text.contains(needle))
}
