const ELLIPSIS: char = '…';

/// Greedy word-boundary split of `text` into pieces of at most `max_len`
/// characters. Every piece but the last ends with an ellipsis; a piece cut
/// without any whitespace to break on may exceed `max_len` by that one mark.
pub(crate) fn split_chunks(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut rest = text.trim();
    if rest.chars().count() <= max_len {
        return vec![rest.to_string()];
    }

    let mut chunks = Vec::new();
    while rest.chars().count() > max_len {
        // Byte offset of the first character past the window.
        let window_end = rest
            .char_indices()
            .nth(max_len)
            .map_or(rest.len(), |(idx, _)| idx);
        let cut = match rest[..window_end].rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => idx,
            _ => window_end,
        };

        let mut chunk = rest[..cut].trim().to_string();
        chunk.push(ELLIPSIS);
        chunks.push(chunk);
        rest = rest[cut..].trim();
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}
