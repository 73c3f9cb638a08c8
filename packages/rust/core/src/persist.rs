//! Writes the finalized output as JSON.

use std::path::Path;

use tracing::info;

use showtime_shared::{Output, Result, ShowtimeError};

/// Serialize `output` to pretty JSON at `path`, creating parent directories.
pub async fn write_output(path: &Path, output: &Output) -> Result<()> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| ShowtimeError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ShowtimeError::io(parent, e))?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|e| ShowtimeError::io(path, e))?;

    info!(path = %path.display(), listings = output.listing_count(), "output written");
    Ok(())
}
