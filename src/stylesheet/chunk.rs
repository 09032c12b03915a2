//! Splitting a stylesheet into per-font-face chunks

const COMMENT_START: &str = "/*";

/// Iterator over the chunks of a stylesheet.
///
/// A new chunk starts immediately before every `/*`. Text ahead of the first
/// comment stays attached to the first chunk, and concatenating every chunk
/// gives back the original text.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        // skip the first char so a chunk never splits at its own leading marker
        let skip = self.rest.chars().next().map_or(0, char::len_utf8);
        let end = self.rest[skip..]
            .find(COMMENT_START)
            .map_or(self.rest.len(), |idx| idx + skip);
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

/// Splits `stylesheet` into chunks, see [`Chunks`].
pub fn split_chunks(stylesheet: &str) -> Chunks<'_> {
    Chunks { rest: stylesheet }
}
