//! Fetching the stylesheet and the fonts it references

use std::{
    io,
    path::{Path, PathBuf},
    pin::pin,
};

use bytes::{Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    font_format::{FontFormat, SIGNATURE_LEN},
    stylesheet::LocalPath,
};

/// Some font services only label each `@font-face` with its charset comment when the request
/// looks like it comes from a browser.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:123.0) Gecko/20100101 Firefox/123.0";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Could not load stylesheet {uri}: {network}; reading it as a local file failed too: {local}")]
    Stylesheet {
        uri: String,
        network: Box<FetchError>,
        local: io::Error,
    },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads one font to its local path.
#[allow(async_fn_in_trait)]
pub trait FontFetcher {
    async fn fetch_font(&self, url: &str, local_path: &LocalPath) -> Result<(), FetchError>;
}

/// Fetches over HTTP and stores fonts below `font_root`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    font_root: PathBuf,
}

impl HttpFetcher {
    pub fn new(font_root: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client, font_root))
    }

    /// Uses a preconfigured client, e.g. one with custom proxy or TLS settings.
    pub fn with_client(client: Client, font_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            font_root: font_root.into(),
        }
    }

    /// Loads the stylesheet at `uri`, which is tried as a URL first and then as a local path.
    pub async fn load_stylesheet(&self, uri: &str) -> Result<String, FetchError> {
        let network = match self.get_text(uri).await {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        log::info!("loading local file {uri}");
        log::debug!("fetching {uri} failed: {network}");
        fs::read_to_string(uri)
            .await
            .map_err(|local| FetchError::Stylesheet {
                uri: uri.to_owned(),
                network: Box::new(network),
                local,
            })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }
        Ok(response)
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            })
    }
}

impl FontFetcher for HttpFetcher {
    async fn fetch_font(&self, url: &str, local_path: &LocalPath) -> Result<(), FetchError> {
        let file_path = local_path.file_path(&self.font_root);
        log::info!("fetching font {} from {url}", local_path.filename);
        let body = self
            .get(url)
            .await?
            .bytes_stream()
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            });
        let format = save_stream(&file_path, body).await?;
        if let Some(warning) = format_mismatch(url, &file_path, format) {
            log::warn!("{warning}");
        }
        Ok(())
    }
}

/// Describes a download whose contents do not match its `.woff2` name.
fn format_mismatch(url: &str, file_path: &Path, format: Option<FontFormat>) -> Option<String> {
    let saved = file_path.display();
    match format {
        Some(FontFormat::Woff2) => None,
        Some(format) => Some(match format.extension() {
            Some(ext) => format!("{url} is {format}, not WOFF2, but was saved as {saved} instead of a .{ext} file"),
            None => format!("{url} is {format}, not WOFF2, but was saved as {saved}"),
        }),
        None => Some(format!("{url} is too short to be a font, but was saved as {saved}")),
    }
}

/// Creates `dir` unless it already exists.
///
/// Several fonts of one family race to create the same directory, so an existing one is fine.
pub async fn ensure_dir(dir: &Path) -> Result<(), FetchError> {
    let write_error = |source| FetchError::Write {
        path: dir.to_path_buf(),
        source,
    };
    match fs::create_dir(dir).await {
        Ok(()) => {
            log::info!("created directory {}", dir.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        // missing parents, e.g. a font root that does not exist yet
        Err(_) => fs::create_dir_all(dir).await.map_err(write_error),
    }
}

/// Writes `body` to `path`, creating the parent directory and truncating any existing file.
///
/// Returns the format sniffed from the first bytes, or `None` when the body is shorter than a
/// signature.
pub async fn save_stream<S>(path: &Path, body: S) -> Result<Option<FontFormat>, FetchError>
where
    S: Stream<Item = Result<Bytes, FetchError>>,
{
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_dir(dir).await?;
    }
    let write_error = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).await.map_err(write_error)?;
    let mut head = BytesMut::with_capacity(SIGNATURE_LEN);
    let mut body = pin!(body);
    while let Some(chunk) = body.try_next().await? {
        if head.len() < SIGNATURE_LEN {
            let take = (SIGNATURE_LEN - head.len()).min(chunk.len());
            head.extend_from_slice(&chunk[..take]);
        }
        file.write_all(&chunk).await.map_err(write_error)?;
    }
    file.flush().await.map_err(write_error)?;

    Ok(FontFormat::sniff(&mut head.freeze()).ok())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use bytes::Bytes;
    use futures::stream;
    use reqwest::{Client, StatusCode};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use crate::font_format::FontFormat;
    use crate::stylesheet::LocalPath;
    use crate::test_resources::{FONTS_CSS, WOFF2_HEADER};

    use super::{ensure_dir, format_mismatch, save_stream, FetchError, FontFetcher, HttpFetcher};

    /// Answers every request on a local port with `status` and `body`; returns the base URL.
    async fn serve(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn local_fetcher(font_root: &Path) -> HttpFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpFetcher::with_client(client, font_root)
    }

    fn roboto_latin() -> LocalPath {
        LocalPath::new("Roboto", "latin", "normal", "400")
    }

    #[tokio::test]
    async fn stylesheet_is_fetched_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve("200 OK", FONTS_CSS.as_bytes()).await;
        let text = local_fetcher(dir.path())
            .load_stylesheet(&format!("{base}/css2?family=Roboto"))
            .await
            .unwrap();
        assert_eq!(FONTS_CSS, text);
    }

    #[tokio::test]
    async fn stylesheet_error_status_falls_back_to_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve("404 Not Found", b"not found").await;
        let err = local_fetcher(dir.path())
            .load_stylesheet(&format!("{base}/fonts.css"))
            .await
            .unwrap_err();
        match err {
            FetchError::Stylesheet { network, local, .. } => {
                assert!(matches!(
                    *network,
                    FetchError::Status {
                        status: StatusCode::NOT_FOUND,
                        ..
                    }
                ));
                assert_eq!(std::io::ErrorKind::NotFound, local.kind());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn font_error_status_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve("404 Not Found", b"<html>not found</html>").await;
        let err = local_fetcher(dir.path())
            .fetch_font(&format!("{base}/roboto.woff2"), &roboto_latin())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert!(!roboto_latin().file_path(dir.path()).exists());
    }

    #[tokio::test]
    async fn font_is_streamed_below_a_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let font_root = dir.path().join("static").join("fonts");
        let base = serve("200 OK", WOFF2_HEADER).await;
        local_fetcher(&font_root)
            .fetch_font(&format!("{base}/roboto.woff2"), &roboto_latin())
            .await
            .unwrap();

        let saved = font_root.join("roboto").join("latin-normal-400.woff2");
        assert_eq!(WOFF2_HEADER, fs::read(saved).unwrap());
    }

    #[test]
    fn client_error_does_not_mention_a_url() {
        let source = Client::new().get("not a url").build().unwrap_err();
        let message = FetchError::Client(source).to_string();
        assert!(message.starts_with("Could not build HTTP client: "), "{message}");
    }

    #[test]
    fn woff2_download_needs_no_warning() {
        let path = roboto_latin().file_path(Path::new("."));
        assert_eq!(None, format_mismatch("https://x/r", &path, Some(FontFormat::Woff2)));
    }

    #[test]
    fn mismatch_warning_names_the_real_extension() {
        let path = roboto_latin().file_path(Path::new("."));
        let warning = format_mismatch("https://x/r", &path, Some(FontFormat::TrueType)).unwrap();
        assert!(warning.contains("TrueType"), "{warning}");
        assert!(warning.ends_with("instead of a .ttf file"), "{warning}");

        let warning = format_mismatch("https://x/r", &path, None).unwrap();
        assert!(warning.contains("too short"), "{warning}");
    }

    #[tokio::test]
    async fn stylesheet_falls_back_to_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let css_path = dir.path().join("fonts.css");
        fs::write(&css_path, FONTS_CSS).unwrap();

        let fetcher = HttpFetcher::new(dir.path()).unwrap();
        let text = fetcher
            .load_stylesheet(css_path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(FONTS_CSS, text);
    }

    #[tokio::test]
    async fn missing_stylesheet_reports_both_failures() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(dir.path()).unwrap();
        let missing = dir.path().join("nope.css");
        let err = fetcher
            .load_stylesheet(missing.to_str().unwrap())
            .await
            .unwrap_err();
        match err {
            FetchError::Stylesheet { network, local, .. } => {
                assert!(matches!(*network, FetchError::Request { .. }));
                assert_eq!(std::io::ErrorKind::NotFound, local.kind());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn stream_is_written_and_sniffed_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roboto").join("latin-normal-400.woff2");
        let body = stream::iter(vec![
            Ok(Bytes::from_static(&WOFF2_HEADER[..2])),
            Ok(Bytes::from_static(&WOFF2_HEADER[2..])),
        ]);

        let format = save_stream(&path, body).await.unwrap();
        assert_eq!(Some(FontFormat::Woff2), format);
        assert_eq!(WOFF2_HEADER, fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn existing_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.woff2");
        fs::write(&path, vec![0u8; 1024]).unwrap();

        let body = stream::iter(vec![Ok(Bytes::from_static(b"wO"))]);
        let format = save_stream(&path, body).await.unwrap();
        assert_eq!(None, format);
        assert_eq!(b"wO".to_vec(), fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn stream_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.woff2");
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"wOF2")),
            Err(FetchError::Status {
                url: "https://x/font.woff2".to_owned(),
                status: StatusCode::BAD_GATEWAY,
            }),
        ]);
        let err = save_stream(&path, body).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
    }

    #[tokio::test]
    async fn existing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let family = dir.path().join("roboto");
        ensure_dir(&family).await.unwrap();
        ensure_dir(&family).await.unwrap();
        assert!(family.is_dir());
    }

    #[tokio::test]
    async fn concurrent_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let family = dir.path().join("open_sans");
        let results = futures::future::join_all((0..8).map(|_| ensure_dir(&family))).await;
        assert!(results.iter().all(Result::is_ok));
    }
}
