//! Application configuration for Showtime.
//!
//! User config lives at `~/.showtime/showtime.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowtimeError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "showtime.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".showtime";

// ---------------------------------------------------------------------------
// Config structs (matching showtime.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Sites to scrape, in run order.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,

    /// Directory the config was loaded from; relative schema paths resolve here.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Where the finalized JSON is written.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Directory for downloaded poster images.
    #[serde(default = "default_poster_dir")]
    pub poster_dir: String,

    /// Offset of the reference timezone used for year rollover, in minutes east of UTC.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,

    /// Page and poster request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            poster_dir: default_poster_dir(),
            utc_offset_minutes: default_utc_offset(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_output_path() -> String {
    "public/movies.json".into()
}
fn default_poster_dir() -> String {
    "public/posters".into()
}
fn default_utc_offset() -> i32 {
    // US Pacific (standard time)
    -8 * 60
}
fn default_timeout() -> u64 {
    60
}

/// `[[sites]]` entry: one theater page and the schema that reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Theater display name.
    pub theater: String,
    /// URL of the showtimes page (`http(s)://` or `file://`).
    pub showings: String,
    /// Map link for the theater.
    #[serde(default)]
    pub map: String,
    /// Neighborhood / area label.
    #[serde(default)]
    pub area: String,
    /// Theater home page.
    #[serde(default)]
    pub link: String,
    /// Schema file describing the page layout.
    pub schema: PathBuf,
}

// ---------------------------------------------------------------------------
// Scrape config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// JSON output file.
    pub output_path: PathBuf,
    /// Poster image directory.
    pub poster_dir: PathBuf,
    /// Reference timezone offset in minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip poster downloads entirely.
    pub skip_posters: bool,
}

impl From<&AppConfig> for ScrapeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_path: PathBuf::from(&config.defaults.output_path),
            poster_dir: PathBuf::from(&config.defaults.poster_dir),
            utc_offset_minutes: config.defaults.utc_offset_minutes,
            timeout_secs: config.defaults.timeout_secs,
            skip_posters: false,
        }
    }
}

impl AppConfig {
    /// Resolve a site's schema path against the config file's directory.
    pub fn schema_path(&self, site: &SiteConfig) -> PathBuf {
        match &self.base_dir {
            Some(base) if site.schema.is_relative() => base.join(&site.schema),
            _ => site.schema.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.showtime/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShowtimeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.showtime/showtime.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ShowtimeError::io(path, e))?;

    let mut config: AppConfig = toml::from_str(&content).map_err(|e| {
        ShowtimeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.base_dir = path.parent().map(Path::to_path_buf);

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ShowtimeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ShowtimeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ShowtimeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
