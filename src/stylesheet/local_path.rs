//! Where a font file lives locally, both on disk and in the rewritten stylesheet

use std::path::{Path, PathBuf};

use super::FontFaceFields;

/// Extension given to every downloaded file. The real format is never inspected here.
pub const FONT_EXTENSION: &str = "woff2";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalPath {
    /// Per-family directory, e.g. `open_sans`
    pub directory: String,
    /// e.g. `latin-normal-400.woff2`
    pub filename: String,
}

impl LocalPath {
    pub fn new(family: &str, charset: &str, style: &str, weight: &str) -> Self {
        Self {
            directory: family_directory(family),
            filename: format!("{charset}-{style}-{weight}.{FONT_EXTENSION}"),
        }
    }

    pub fn from_fields(fields: &FontFaceFields<'_>) -> Self {
        Self::new(fields.family, fields.charset, fields.style, fields.weight)
    }

    /// The file's location on disk below `root`.
    pub fn file_path(&self, root: &Path) -> PathBuf {
        root.join(&self.directory).join(&self.filename)
    }

    /// The file's URL below `base`, always joined with `/`.
    pub fn url(&self, base: &str) -> String {
        let mut url = String::from(base.trim_end_matches('/'));
        if !base.is_empty() {
            url.push('/');
        }
        url.push_str(&self.directory);
        url.push('/');
        url.push_str(&self.filename);
        url
    }
}

/// Lowercases the family name and maps everything but ASCII letters and digits to `_`.
pub fn family_directory(family: &str) -> String {
    family
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
