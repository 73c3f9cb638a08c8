//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use showtime_core::{ProgressReporter, RunReport, check_schema, run_sites};
use showtime_engine::{Clock, ScrapeSummary};
use showtime_shared::{
    AppConfig, ScrapeConfig, ShowtimeError, init_config, load_config, load_config_from,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Showtime: collect movie showtimes from theater pages.
#[derive(Parser)]
#[command(
    name = "showtime",
    version,
    about = "Scrape theater showtime pages into one JSON schedule using layout schemas.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.showtime/showtime.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape every configured site and write the JSON schedule.
    Scrape {
        /// Output JSON file (overrides config).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Poster directory (overrides config).
        #[arg(long)]
        posters: Option<PathBuf>,

        /// Do not download poster images.
        #[arg(long)]
        no_posters: bool,
    },

    /// Validate a schema file, optionally walking a saved page with it.
    Check {
        /// Schema file (.json or .toml).
        schema: PathBuf,

        /// Local HTML page to dry-run the schema against.
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "showtime=info",
        1 => "showtime=debug",
        _ => "showtime=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Scrape {
            out,
            posters,
            no_posters,
        } => cmd_scrape(config_path, out, posters, no_posters).await,
        Command::Check { schema, page } => cmd_check(config_path, &schema, page.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn load_app_config(path: Option<&Path>) -> Result<AppConfig, ShowtimeError> {
    match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    config_path: Option<&Path>,
    out: Option<PathBuf>,
    posters: Option<PathBuf>,
    no_posters: bool,
) -> Result<()> {
    let config = load_app_config(config_path)?;

    let mut scrape = ScrapeConfig::from(&config);
    if let Some(out) = out {
        scrape.output_path = out;
    }
    if let Some(posters) = posters {
        scrape.poster_dir = posters;
    }
    scrape.skip_posters = no_posters;

    info!(
        sites = config.sites.len(),
        output = %scrape.output_path.display(),
        "scraping showtimes"
    );

    let clock = Clock::system(scrape.utc_offset_minutes)?;
    let reporter = CliProgress::new();
    let report = run_sites(&config, &scrape, clock, &reporter).await?;

    print_report(&report);

    if report.all_failed() {
        return Err(eyre!("all {} sites failed", report.failures.len()));
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    println!("  Scrape finished.");
    println!("  Sites:    {} ok, {} failed", report.sites_ok, report.failures.len());
    println!("  Listings: {}", report.listings);
    println!(
        "  Posters:  {} saved, {} cached, {} failed",
        report.posters.saved, report.posters.skipped, report.posters.failed
    );
    println!("  Output:   {}", report.output_path.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    for failure in &report.failures {
        println!("  ! {}: {}", failure.theater, failure.error);
    }
    println!();
}

fn cmd_check(config_path: Option<&Path>, schema: &Path, page: Option<&Path>) -> Result<()> {
    let config = load_app_config(config_path)?;
    let clock = Clock::system(config.defaults.utc_offset_minutes)?;
    let report = check_schema(schema, page, clock)?;

    println!(
        "  {}: {} nodes, {} actions",
        schema.display(),
        report.nodes,
        report.actions
    );

    if let Some(dry_run) = report.dry_run {
        println!(
            "  Dry run: {} showings, {} listings, {} posters across {} dates",
            dry_run.summary.showings,
            dry_run.summary.listings,
            dry_run.posters,
            dry_run.output.dates.len()
        );
        if dry_run.summary.listings == 0 {
            warn!("schema matched no listings on the sample page");
        }
    }
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn site_started(&self, theater: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Scraping [{current}/{total}] {theater}"));
    }

    fn site_finished(&self, theater: &str, summary: &ScrapeSummary) {
        self.spinner.println(format!(
            "  ✓ {theater}: {} listings, {} showings",
            summary.listings, summary.showings
        ));
    }

    fn site_failed(&self, theater: &str, error: &ShowtimeError) {
        self.spinner.println(format!("  ✗ {theater}: {error}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
