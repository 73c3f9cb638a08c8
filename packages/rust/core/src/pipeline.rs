//! End-to-end `scrape` pipeline: sites → pages → listings → posters → JSON.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use scraper::Html;
use tracing::{error, info, instrument, warn};
use url::Url;

use showtime_engine::{Clock, HtmlNode, ScrapeSummary, Scraper, SiteContext, load_schema};
use showtime_shared::{AppConfig, Result, ScrapeConfig, ShowtimeError, SiteConfig};

use crate::fetch::{Fetcher, page_url};
use crate::persist::write_output;
use crate::posters::{PosterJob, PosterReport, download_posters};

/// A site that could not be scraped.
#[derive(Debug, Clone)]
pub struct SiteFailure {
    pub theater: String,
    pub error: String,
}

/// Result of a `scrape` run.
#[derive(Debug)]
pub struct RunReport {
    /// Sites scraped without error.
    pub sites_ok: usize,
    /// Sites that failed, in run order.
    pub failures: Vec<SiteFailure>,
    /// Listings written to the output.
    pub listings: usize,
    pub posters: PosterReport,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl RunReport {
    /// Whether at least one site was configured and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.sites_ok == 0 && !self.failures.is_empty()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a site is loaded.
    fn site_started(&self, theater: &str, current: usize, total: usize);
    /// Called after a site was scraped.
    fn site_finished(&self, theater: &str, summary: &ScrapeSummary);
    /// Called when a site is abandoned.
    fn site_failed(&self, theater: &str, error: &ShowtimeError);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn site_started(&self, _theater: &str, _current: usize, _total: usize) {}
    fn site_finished(&self, _theater: &str, _summary: &ScrapeSummary) {}
    fn site_failed(&self, _theater: &str, _error: &ShowtimeError) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run every configured site and write the combined output.
///
/// 1. For each site: load schema, load page, walk it
/// 2. Download posters (unless disabled)
/// 3. Order and write the JSON output
///
/// A failing site is logged and skipped; the others still run, and listings
/// it completed before failing are kept. Year-less dates resolve against
/// `clock`.
#[instrument(skip_all, fields(sites = config.sites.len()))]
pub async fn run_sites(
    config: &AppConfig,
    scrape: &ScrapeConfig,
    clock: Clock,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    if config.sites.is_empty() {
        return Err(ShowtimeError::config("no sites configured"));
    }

    let start = Instant::now();
    let mut scraper = Scraper::new(clock);
    let mut fetcher = Fetcher::new(scrape.timeout_secs)?;

    let mut sites_ok = 0;
    let mut failures = Vec::new();
    let mut poster_jobs = Vec::new();
    let total = config.sites.len();

    info!(sites = total, "starting scrape");

    // --- Phase 1: Sites ---
    for (i, site) in config.sites.iter().enumerate() {
        progress.site_started(&site.theater, i + 1, total);

        let result = scrape_site(config, site, &fetcher, &mut scraper).await;

        match result {
            Ok((page, summary)) => {
                sites_ok += 1;
                progress.site_finished(&site.theater, &summary);
                queue_posters(&page, &mut scraper, &mut poster_jobs);
            }
            Err((page, e)) => {
                error!(theater = %site.theater, error = %e, "site failed, continuing");
                progress.site_failed(&site.theater, &e);
                failures.push(SiteFailure {
                    theater: site.theater.clone(),
                    error: e.to_string(),
                });
                if let Some(page) = page {
                    queue_posters(&page, &mut scraper, &mut poster_jobs);
                }
                // Start the next site on a fresh connection pool.
                fetcher = Fetcher::new(scrape.timeout_secs)?;
            }
        }
    }

    // --- Phase 2: Posters ---
    let posters = if scrape.skip_posters {
        PosterReport::default()
    } else {
        progress.phase("Downloading posters");
        download_posters(&fetcher, &poster_jobs, &scrape.poster_dir).await?
    };

    // --- Phase 3: Output ---
    progress.phase("Writing output");
    let output = scraper.finalize();
    write_output(&scrape.output_path, &output).await?;

    let report = RunReport {
        sites_ok,
        failures,
        listings: output.listing_count(),
        posters,
        output_path: scrape.output_path.clone(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        sites_ok = report.sites_ok,
        sites_failed = report.failures.len(),
        listings = report.listings,
        posters_saved = report.posters.saved,
        elapsed_ms = report.elapsed.as_millis(),
        "scrape complete"
    );

    Ok(report)
}

type SiteError = (Option<Url>, ShowtimeError);

/// Load and walk one site. On failure, returns the page URL if it was known.
async fn scrape_site(
    config: &AppConfig,
    site: &SiteConfig,
    fetcher: &Fetcher,
    scraper: &mut Scraper,
) -> std::result::Result<(Url, ScrapeSummary), SiteError> {
    let schema = load_schema(&config.schema_path(site)).map_err(|e| (None, e))?;
    let page = page_url(&site.showings).map_err(|e| (None, e))?;
    let body = fetcher
        .text(&page)
        .await
        .map_err(|e| (Some(page.clone()), e))?;

    match walk_page(&body, &schema, site, scraper) {
        Ok(summary) => Ok((page, summary)),
        Err(e) => Err((Some(page), e)),
    }
}

/// Parse `body` and run `schema` over it.
///
/// Kept synchronous: the parsed document never lives across an await.
fn walk_page(
    body: &str,
    schema: &showtime_engine::Schema,
    site: &SiteConfig,
    scraper: &mut Scraper,
) -> Result<ScrapeSummary> {
    let document = Html::parse_document(body);
    scraper.scrape(&HtmlNode::root(&document), schema, &SiteContext::from(site))
}

fn queue_posters(page: &Url, scraper: &mut Scraper, jobs: &mut Vec<PosterJob>) {
    for request in scraper.take_posters() {
        match PosterJob::resolve(page, request) {
            Ok(job) => jobs.push(job),
            Err(e) => warn!(error = %e, "poster skipped"),
        }
    }
}
