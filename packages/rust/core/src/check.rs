//! Schema validation and offline dry runs for the `check` command.

use std::path::Path;

use scraper::Html;
use tracing::info;

use showtime_engine::{Clock, HtmlNode, ScrapeSummary, Scraper, SiteContext, load_schema};
use showtime_shared::{Output, Result, ShowtimeError};

/// What a schema check found.
#[derive(Debug)]
pub struct CheckReport {
    pub nodes: usize,
    pub actions: usize,
    /// Present when a sample page was walked.
    pub dry_run: Option<DryRun>,
}

/// Result of walking a sample page.
#[derive(Debug)]
pub struct DryRun {
    pub summary: ScrapeSummary,
    pub output: Output,
    pub posters: usize,
}

/// Load and validate `schema_path`; walk `page` with it when given.
///
/// Nothing is downloaded or written.
pub fn check_schema(schema_path: &Path, page: Option<&Path>, clock: Clock) -> Result<CheckReport> {
    let schema = load_schema(schema_path)?;
    let nodes = schema.node_count();
    let actions = schema.action_count();
    info!(path = %schema_path.display(), nodes, actions, "schema valid");

    let dry_run = match page {
        Some(page) => {
            let body = std::fs::read_to_string(page).map_err(|e| ShowtimeError::io(page, e))?;
            let document = Html::parse_document(&body);
            let mut scraper = Scraper::new(clock);
            let summary = scraper.scrape(
                &HtmlNode::root(&document),
                &schema,
                &SiteContext::default(),
            )?;
            Some(DryRun {
                summary,
                posters: scraper.take_posters().len(),
                output: scraper.finalize(),
            })
        }
        None => None,
    };

    Ok(CheckReport {
        nodes,
        actions,
        dry_run,
    })
}
