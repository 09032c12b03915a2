//! Interface for localizing a font stylesheet

use futures::future::try_join_all;
use thiserror::Error;

use crate::{
    config::Config,
    fetch::{FetchError, FontFetcher},
    stylesheet::{replace_url, split_chunks, FontFaceFields, LocalPath, MalformedChunkError},
};

#[derive(Error, Debug)]
pub enum LocalizeError {
    #[error("Empty stylesheet")]
    EmptyStylesheet,
    #[error(transparent)]
    MalformedChunk(#[from] MalformedChunkError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

struct ParsedChunk<'a> {
    text: &'a str,
    fields: FontFaceFields<'a>,
    local_path: LocalPath,
}

impl<'a> ParsedChunk<'a> {
    fn parse(text: &'a str) -> Result<Self, MalformedChunkError> {
        let fields = FontFaceFields::from_chunk(text)?;
        let local_path = LocalPath::from_fields(&fields);
        Ok(Self {
            text,
            fields,
            local_path,
        })
    }
}

/// Downloads every font referenced by `stylesheet` through `fetcher` and returns the stylesheet
/// rewritten to point at the local copies.
///
/// Every chunk is parsed before any download starts, so a malformed chunk fails the run without
/// touching the network. Downloads then all run at once; the first failure aborts the rest. The
/// output keeps the input's chunk order regardless of which download finishes first.
pub async fn localize_stylesheet<F: FontFetcher>(
    stylesheet: &str,
    fetcher: &F,
    config: &Config,
) -> Result<String, LocalizeError> {
    let chunks = split_chunks(stylesheet)
        .map(ParsedChunk::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if chunks.is_empty() {
        Err(LocalizeError::EmptyStylesheet)?;
    }
    if config.dry_run {
        log::info!("dry run, skipping {} font downloads", chunks.len());
    }

    let localized = try_join_all(
        chunks
            .iter()
            .map(|chunk| localize_chunk(chunk, fetcher, config)),
    )
    .await?;

    Ok(localized.concat())
}

async fn localize_chunk<F: FontFetcher>(
    chunk: &ParsedChunk<'_>,
    fetcher: &F,
    config: &Config,
) -> Result<String, LocalizeError> {
    let remote_url = chunk.fields.remote_url;
    if !config.dry_run {
        if let Err(err) = fetcher.fetch_font(remote_url, &chunk.local_path).await {
            log::error!("fetching {remote_url} failed: {err}");
            return Err(err.into());
        }
    }
    let local_url = chunk.local_path.url(&config.url_base_dir);
    Ok(replace_url(chunk.text, &format!("'{local_url}'"))?)
}
