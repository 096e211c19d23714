//! Word extraction from raw chunk buffers.
//!
//! A word is a maximal run of ASCII alphanumeric bytes. Every other byte
//! (whitespace, punctuation, control bytes, anything above 0x7F) delimits.
//! Matching is case-sensitive: no case folding happens here.
//!
//! Chunks are tokenized independently, so a word that straddles the
//! boundary between two chunks comes out as two fragments, one from each
//! chunk. Counts are therefore exact only for words that do not cross a
//! chunk boundary; each boundary can split at most one word.

/// Returns true for bytes that can appear inside a word
#[inline]
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Extract words from a byte slice
pub fn tokenize(content: &[u8]) -> impl Iterator<Item = &str> + '_ {
    WordIterator::new(content)
}

/// Iterator that yields words from content
pub struct WordIterator<'a> {
    content: &'a [u8],
    position: usize,
}

impl<'a> WordIterator<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    #[inline]
    fn skip_delimiters(&mut self) {
        while self.position < self.content.len() && !is_word_byte(self.content[self.position]) {
            self.position += 1;
        }
    }

    #[inline]
    fn read_word(&mut self) -> &'a [u8] {
        let start = self.position;

        while self.position < self.content.len() && is_word_byte(self.content[self.position]) {
            self.position += 1;
        }

        &self.content[start..self.position]
    }
}

impl<'a> Iterator for WordIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_delimiters();

            if self.position >= self.content.len() {
                return None;
            }

            // Word bytes are ASCII, so this never fails
            if let Ok(word) = std::str::from_utf8(self.read_word()) {
                return Some(word);
            }
        }
    }
}
