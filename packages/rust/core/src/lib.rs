//! Pipeline orchestration for Showtime.
//!
//! This crate ties page loading, the extraction engine, poster downloads and
//! JSON persistence into the end-to-end `scrape` run, plus the offline
//! schema `check`.

pub mod check;
pub mod fetch;
pub mod persist;
pub mod pipeline;
pub mod posters;

pub use check::{CheckReport, DryRun, check_schema};
pub use fetch::{Fetcher, page_url};
pub use persist::write_output;
pub use pipeline::{ProgressReporter, RunReport, SilentProgress, SiteFailure, run_sites};
pub use posters::{PosterJob, PosterReport, download_posters, poster_path};
