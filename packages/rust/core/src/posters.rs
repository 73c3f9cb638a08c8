//! Poster image downloads.
//!
//! Each poster is stored once as `<poster_dir>/<file_stem>.png`; a file that
//! already exists is never fetched again.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

use showtime_engine::PosterRequest;
use showtime_shared::{Result, ShowtimeError};

use crate::fetch::Fetcher;

/// Extension every poster is saved under.
const POSTER_EXTENSION: &str = "png";

/// A poster request resolved against the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterJob {
    pub file_stem: String,
    pub url: Url,
}

impl PosterJob {
    /// Resolve `request.src` relative to `page`.
    pub fn resolve(page: &Url, request: PosterRequest) -> Result<Self> {
        let url = page.join(&request.src).map_err(|e| {
            ShowtimeError::config(format!("bad poster src {:?}: {e}", request.src))
        })?;
        Ok(Self {
            file_stem: request.file_stem,
            url,
        })
    }
}

/// Download outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PosterReport {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Path a poster with `file_stem` is stored at.
pub fn poster_path(dir: &Path, file_stem: &str) -> PathBuf {
    dir.join(format!("{file_stem}.{POSTER_EXTENSION}"))
}

/// Fetch every poster not already on disk.
///
/// Individual download failures are logged and counted; only failing to
/// create `dir` is an error.
pub async fn download_posters(
    fetcher: &Fetcher,
    jobs: &[PosterJob],
    dir: &Path,
) -> Result<PosterReport> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ShowtimeError::io(dir, e))?;

    let mut report = PosterReport::default();
    for job in jobs {
        let target = poster_path(dir, &job.file_stem);
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!(path = %target.display(), "poster exists, skipped");
            report.skipped += 1;
            continue;
        }

        let written = match fetcher.bytes(&job.url).await {
            Ok(bytes) => tokio::fs::write(&target, bytes)
                .await
                .map_err(|e| ShowtimeError::io(&target, e)),
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                debug!(url = %job.url, path = %target.display(), "poster saved");
                report.saved += 1;
            }
            Err(e) => {
                warn!(url = %job.url, error = %e, "poster download failed");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}
