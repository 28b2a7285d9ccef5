mod export;
mod store_list;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use storecrawl_core::{AggregateResult, AppConfig, UnreachablePolicy};
use storecrawl_scraper::CrawlOrchestrator;
use tracing_subscriber::EnvFilter;

use crate::export::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "storecrawl")]
#[command(about = "Crawl e-commerce stores for contact links and product samples")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every store in the list and export links and sampled products
    Crawl(CrawlArgs),
    /// Print the normalized, de-duplicated store list without crawling
    Stores {
        /// Store list (.csv with a `url` column, or .txt with one store per line)
        #[arg(long, short)]
        input: PathBuf,
    },
}

#[derive(Debug, Args)]
struct CrawlArgs {
    /// Store list (.csv with a `url` column, or .txt with one store per line)
    #[arg(long, short)]
    input: PathBuf,

    /// Output file; results go to stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Products sampled per store
    #[arg(long)]
    sample_size: Option<usize>,

    /// Stores crawled concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Catalog page path, overriding the platform default
    #[arg(long)]
    catalog_path: Option<String>,

    /// Informational page to scan; repeat to scan several (replaces the defaults)
    #[arg(long = "page")]
    pages: Vec<String>,

    /// Abort the whole run when a store cannot be reached
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storecrawl_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Crawl(args) => run_crawl(config, args).await,
        Commands::Stores { input } => list_stores(&input),
    }
}

async fn run_crawl(config: AppConfig, args: CrawlArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;
    let stores = store_list::read_stores(&args.input)?;

    let result = if stores.is_empty() {
        tracing::warn!(input = %args.input.display(), "store list is empty; nothing to crawl");
        AggregateResult::new()
    } else {
        tracing::info!(stores = stores.len(), ?config, "starting crawl");
        let orchestrator = CrawlOrchestrator::from_config(&config)
            .context("failed to build HTTP client")?;
        orchestrator.run(stores).await?
    };

    write_output(&result, args.output.as_deref(), args.format)?;

    if result.failed_count() > 0 {
        tracing::warn!(
            unreachable = result.failed_count(),
            total = result.len(),
            "crawl finished with unreachable stores"
        );
    }
    Ok(())
}

/// Exports to `output`, or to stdout when no file is given. The file is
/// written even for an empty result.
fn write_output(
    result: &AggregateResult,
    output: Option<&Path>,
    format: ExportFormat,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            export::export(std::io::BufWriter::new(file), result, format)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), stores = result.len(), "results written");
        }
        None => export::export(std::io::stdout().lock(), result, format)?,
    }
    Ok(())
}

fn list_stores(input: &Path) -> anyhow::Result<()> {
    let stores = store_list::read_stores(input)?;
    let mut out = std::io::stdout().lock();
    for store in &stores {
        writeln!(out, "{store}")?;
    }
    Ok(())
}

/// Layers command line flags over the environment configuration.
fn apply_overrides(mut config: AppConfig, args: &CrawlArgs) -> anyhow::Result<AppConfig> {
    if let Some(sample_size) = args.sample_size {
        config.product_sample_size = sample_size;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrent_stores = concurrency;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        if timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }
        config.request_timeout_secs = timeout_secs;
    }
    if let Some(catalog_path) = &args.catalog_path {
        config.catalog_path = Some(catalog_path.clone());
    }
    if !args.pages.is_empty() {
        config.info_pages.clone_from(&args.pages);
    }
    if args.fail_fast {
        config.unreachable_policy = UnreachablePolicy::FailRun;
    }
    Ok(config)
}
