use std::{io, path::PathBuf, process};

use clap::Parser;
use thiserror::Error;
use webfont_dl::{localize_stylesheet, Config, FetchError, HttpFetcher, LocalizeError};

#[derive(Debug, Error)]
enum Error {
    #[error("requires a URI to a font CSS file (local path or url)")]
    Usage,
    #[error(transparent)]
    Localize(#[from] LocalizeError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Could not write {}: {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
}

/// Download the fonts of a stylesheet and rewrite it to use the local copies.
///
/// Set URL_BASE_DIR to prefix the rewritten URLs and DRY_RUN=true to skip downloading.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// URL or local path of the font stylesheet
    source: Option<String>,

    /// Where to write the rewritten stylesheet
    #[clap(short, long, default_value = "font.css")]
    output: PathBuf,

    /// Directory the per-family font directories are created in
    #[clap(long, default_value = ".")]
    font_root: PathBuf,
}

async fn run(args: Args) -> Result<(), Error> {
    let source = args.source.ok_or(Error::Usage)?;
    let config = Config::from_env();
    let fetcher = HttpFetcher::new(args.font_root)?;

    let stylesheet = fetcher.load_stylesheet(&source).await?;
    let localized = localize_stylesheet(&stylesheet, &fetcher, &config).await?;

    tokio::fs::write(&args.output, localized)
        .await
        .map_err(|source| Error::Output {
            path: args.output.clone(),
            source,
        })?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()).await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
