//! Splitting a font stylesheet into chunks, reading their fields, and rewriting their URLs.

use std::fmt;

use thiserror::Error;

pub mod chunk;
pub mod fields;
pub mod local_path;

pub use chunk::{split_chunks, Chunks};
pub use fields::{replace_url, FontFaceFields};
pub use local_path::LocalPath;

/// A field read from a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Charset,
    Family,
    Style,
    Weight,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Charset => "charset comment",
            Field::Family => "font-family",
            Field::Style => "font-style",
            Field::Weight => "font-weight",
            Field::Url => "src url",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed chunk: missing {field}")]
pub struct MalformedChunkError {
    pub field: Field,
}
