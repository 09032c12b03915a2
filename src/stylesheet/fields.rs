//! Field extraction and URL rewriting for a single chunk

use std::ops::Range;

use super::{Field, MalformedChunkError};

const CHARSET_MARKER: &str = "/* ";
const FAMILY_MARKER: &str = "font-family: '";
const STYLE_MARKER: &str = "font-style: ";
const WEIGHT_MARKER: &str = "font-weight: ";
const URL_MARKER: &str = "src: url(";

/// The values read out of one `@font-face` chunk. Every field borrows from the chunk text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFaceFields<'a> {
    pub charset: &'a str,
    pub style: &'a str,
    pub weight: &'a str,
    pub family: &'a str,
    pub remote_url: &'a str,
}

impl<'a> FontFaceFields<'a> {
    pub fn from_chunk(chunk: &'a str) -> Result<Self, MalformedChunkError> {
        Ok(Self {
            charset: capture(chunk, Field::Charset)?,
            style: capture(chunk, Field::Style)?,
            weight: capture(chunk, Field::Weight)?,
            family: capture(chunk, Field::Family)?,
            remote_url: capture(chunk, Field::Url)?,
        })
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Field {
    fn marker(self) -> &'static str {
        match self {
            Field::Charset => CHARSET_MARKER,
            Field::Family => FAMILY_MARKER,
            Field::Style => STYLE_MARKER,
            Field::Weight => WEIGHT_MARKER,
            Field::Url => URL_MARKER,
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Field::Charset => is_word(c) || c == '-',
            Field::Family => c != '\'',
            Field::Style => is_word(c),
            Field::Weight => c.is_ascii_digit(),
            Field::Url => c != ')',
        }
    }

    /// Charset and URL may legitimately be empty.
    fn min_len(self) -> usize {
        match self {
            Field::Charset | Field::Url => 0,
            Field::Family | Field::Style | Field::Weight => 1,
        }
    }
}

/// Finds the byte range of `field` in `chunk`.
///
/// Every occurrence of the field's marker is tried in order; the first one followed by a long
/// enough run of accepted characters wins.
fn locate(chunk: &str, field: Field) -> Result<Range<usize>, MalformedChunkError> {
    let marker = field.marker();
    chunk
        .match_indices(marker)
        .find_map(|(idx, _)| {
            let start = idx + marker.len();
            let len = chunk[start..]
                .find(|c: char| !field.accepts(c))
                .unwrap_or(chunk.len() - start);
            (len >= field.min_len()).then(|| start..start + len)
        })
        .ok_or(MalformedChunkError { field })
}

fn capture(chunk: &str, field: Field) -> Result<&str, MalformedChunkError> {
    locate(chunk, field).map(|range| &chunk[range])
}

/// Returns `chunk` with the contents of its `src: url(...)` replaced by `replacement`, verbatim.
///
/// Only the first URL is replaced.
pub fn replace_url(chunk: &str, replacement: &str) -> Result<String, MalformedChunkError> {
    let range = locate(chunk, Field::Url)?;
    let mut out = String::with_capacity(chunk.len() - range.len() + replacement.len());
    out.push_str(&chunk[..range.start]);
    out.push_str(replacement);
    out.push_str(&chunk[range.end..]);
    Ok(out)
}
