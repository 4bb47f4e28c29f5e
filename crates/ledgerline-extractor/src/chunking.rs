//! Line-aware chunking of long document text

/// Splits text into windows of at most `chunk_size` characters
///
/// A window that would end inside the text is pulled back to the last
/// newline inside it (when that newline is past the window start), so rows
/// are not cut in half. Chunks are trimmed and empty chunks dropped.
pub struct TextChunker {
    chunk_size: usize,
}

impl TextChunker {
    /// Create a new text chunker; a size of 0 is treated as 1
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Configured window size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk the given text
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let rest = &text[start..];
            let mut end = match rest.char_indices().nth(self.chunk_size) {
                Some((offset, _)) => start + offset,
                None => text.len(),
            };

            if end < text.len() {
                if let Some(newline) = text[start..end].rfind('\n') {
                    if newline > 0 {
                        end = start + newline;
                    }
                }
            }

            let chunk = text[start..end].trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            start = end;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_is_one_chunk() {
        let chunker = TextChunker::new(100);
        let chunks = chunker.chunk("  Short text here.\n");
        assert_eq!(chunks, vec!["Short text here."]);
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(100);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk(" \n\n  ").is_empty());
    }

    #[test]
    fn test_breaks_at_newline() {
        let chunker = TextChunker::new(15);
        let chunks = chunker.chunk("row one 100\nrow two 200\nrow three 300");
        assert_eq!(chunks, vec!["row one 100", "row two 200", "row three 300"]);
    }

    #[test]
    fn test_long_line_is_hard_cut() {
        let chunker = TextChunker::new(20);
        let text = "a".repeat(50);
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 20);
        assert_eq!(chunks[2].len(), 10);
    }

    #[test]
    fn test_newline_at_window_start_is_not_used() {
        // The only newline is at the window start, so the window is cut hard
        let chunker = TextChunker::new(5);
        let chunks = chunker.chunk("abcde\nfghijkl");
        assert_eq!(chunks, vec!["abcde", "fghi", "jkl"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunker = TextChunker::new(4);
        let chunks = chunker.chunk("₦₦₦₦₦₦");
        assert_eq!(chunks, vec!["₦₦₦₦", "₦₦"]);
    }

    #[test]
    fn test_zero_size_does_not_loop() {
        let chunker = TextChunker::new(0);
        assert_eq!(chunker.chunk_size(), 1);
        assert_eq!(chunker.chunk("ab").len(), 2);
    }
}
