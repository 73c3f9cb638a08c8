//! Page and image loading over HTTP(S) or from `file://` URLs.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use showtime_shared::{Result, ShowtimeError};

/// User-Agent string for page and poster requests.
const USER_AGENT: &str = concat!("Showtime/", env!("CARGO_PKG_VERSION"));

/// Loads showtime pages and poster images.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ShowtimeError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch a page as text.
    pub async fn text(&self, url: &Url) -> Result<String> {
        let bytes = self.bytes(url).await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Fetch raw bytes.
    pub async fn bytes(&self, url: &Url) -> Result<Vec<u8>> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|()| ShowtimeError::config(format!("not a local file URL: {url}")))?;
            debug!(path = %path.display(), "reading local file");
            return tokio::fs::read(&path)
                .await
                .map_err(|e| ShowtimeError::io(&path, e));
        }

        debug!(%url, "fetching");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ShowtimeError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShowtimeError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ShowtimeError::Network(format!("{url}: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Parse a configured page location.
///
/// Bare filesystem paths are accepted and turned into `file://` URLs.
pub fn page_url(location: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(location) {
        return Ok(url);
    }
    let path = std::path::absolute(location).map_err(|e| ShowtimeError::io(location, e))?;
    Url::from_file_path(&path)
        .map_err(|()| ShowtimeError::config(format!("invalid page location: {location}")))
}
