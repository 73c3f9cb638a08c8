//! Shared types, error model, and configuration for Showtime.
//!
//! This crate is the foundation depended on by all other Showtime crates.
//! It provides:
//! - [`ShowtimeError`]: the unified error type
//! - Output record types ([`Showing`], [`Listing`], [`TitleBucket`], [`Output`])
//! - Configuration ([`AppConfig`], [`SiteConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ScrapeConfig, SiteConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, ShowtimeError};
pub use types::{DateSchedule, Listing, Output, Showing, TitleBucket};
