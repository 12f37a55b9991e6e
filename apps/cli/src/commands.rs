//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use thumbfill_pipeline::{BatchReport, Pipeline, ProgressReporter};
use thumbfill_shared::{
    AppConfig, PipelineConfig, ThumbfillError, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// thumbfill — backfill article thumbnails from Unsplash.
#[derive(Parser)]
#[command(
    name = "thumbfill",
    version,
    about = "Backfill missing article thumbnails from Unsplash and rewrite the articles JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to an alternate config file.
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
    /// Backfill thumbnails for every article missing one.
    ProcessAll,

    /// Process exactly one article by URL (reprocesses an existing thumbnail).
    ProcessArticle {
        /// Article URL to process.
        url: Option<String>,
    },

    /// Print thumbnail coverage statistics.
    Stats,

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
        0 => "thumbfill=info",
        1 => "thumbfill=debug",
        _ => "thumbfill=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_override = cli.config.clone();
    match cli.command {
        Command::ProcessAll => cmd_process_all(config_override.as_deref()).await,
        Command::ProcessArticle { url } => {
            cmd_process_article(config_override.as_deref(), url.as_deref()).await
        }
        Command::Stats => cmd_stats(config_override.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_override.as_deref()).await,
        },
    }
}

/// Load the app config, honoring a `--config` override.
fn load_app_config(config_path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_pipeline(config_path: Option<&std::path::Path>) -> Result<Pipeline> {
    let config = load_app_config(config_path)?;
    let pipeline_config = PipelineConfig::resolve(&config);
    Ok(Pipeline::new(pipeline_config)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_process_all(config_path: Option<&std::path::Path>) -> Result<()> {
    let pipeline = build_pipeline(config_path)?;

    info!(
        store = %pipeline.config().content_store_path.display(),
        "starting batch thumbnail backfill"
    );

    let reporter = CliProgress::new();
    let report = pipeline.process_all_articles(&reporter).await?;

    println!();
    println!("  Thumbnail backfill complete!");
    println!("  Processed: {}", report.processed);
    println!("  Skipped:   {}", report.skipped);
    println!("  Fallbacks: {}", report.fallbacks);
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_process_article(
    config_path: Option<&std::path::Path>,
    url: Option<&str>,
) -> Result<()> {
    let url = url.ok_or_else(|| eyre!("article URL required: thumbfill process-article <url>"))?;

    let pipeline = build_pipeline(config_path)?;

    match pipeline.process_specific_article(url).await {
        Ok(path) => {
            println!("Thumbnail set: {path}");
            Ok(())
        }
        Err(ThumbfillError::ArticleNotFound { url }) => {
            // Reported, nothing written, exit 0.
            error!(url = %url, "article not found in content store");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_stats(config_path: Option<&std::path::Path>) -> Result<()> {
    let pipeline = build_pipeline(config_path)?;
    let stats = pipeline.image_stats()?;

    println!("Thumbnail coverage:");
    println!("  Total articles:  {}", stats.total);
    println!("  With images:     {}", stats.with_images);
    println!("  Local images:    {}", stats.with_local_images);
    println!("  External images: {}", stats.with_external_images);
    println!("  Without images:  {}", stats.with_null_images);

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = load_app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn article_started(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Processing [{current}/{total}] {title}"));
    }

    fn done(&self, _report: &BatchReport) {
        self.spinner.finish_and_clear();
    }
}
