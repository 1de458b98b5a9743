use anyhow::{Context as AnyhowContext, Result};
use chrono::Local;
use clap::Parser;
use litpack_batcher::PackerConfig;
use litpack_pubmed::{PubmedClient, PubmedConfig, SearchQuery, DEFAULT_BASE_URL};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

mod flags;
mod logging;
pub mod pipeline;
pub mod report;
pub mod sink;

use flags::CostModelFlag;
use pipeline::{RunOutcome, RunSettings};
use report::RunContext;
use sink::DirectorySink;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "litpack")]
#[command(about = "Fetch PubMed abstracts and pack them into token-bounded batches", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:
  litpack --email you@example.org --query \"machine learning\" --years 5
  litpack --email you@example.org --query '\"Deep Learning\"[MeSH]' --years 3
  litpack --email you@example.org --query bioinformatics --review-only
  litpack --email you@example.org --query CRISPR --max-results 500 --token-limit 10000 --output-dir ./my_output")]
struct Cli {
    /// Contact email sent to NCBI with every request
    #[arg(long, env = "NCBI_EMAIL")]
    email: String,

    /// NCBI API key (optional, allows a faster request rate)
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// PubMed search query (supports MeSH terms)
    #[arg(long)]
    query: String,

    /// Publication date range in years back from today
    #[arg(long, default_value_t = 5)]
    years: u32,

    /// Maximum number of articles to fetch
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Maximum tokens per batch
    #[arg(long, default_value_t = 8000)]
    token_limit: usize,

    /// Output directory for batches, summary and run log
    #[arg(long, default_value = "./pubmed_output")]
    output_dir: PathBuf,

    /// Fetch only review articles
    #[arg(long)]
    review_only: bool,

    /// Cost model used to size articles
    #[arg(long, value_enum, default_value_t = CostModelFlag::Tiktoken)]
    cost_model: CostModelFlag,

    /// E-utilities base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    base_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let pubmed_config = PubmedConfig::new(cli.email.clone())
        .with_api_key(cli.api_key.clone())
        .with_base_url(cli.base_url.clone());
    pubmed_config
        .validate()
        .context("Invalid PubMed configuration")?;
    let packer_config = PackerConfig::with_capacity(cli.token_limit);
    packer_config
        .validate()
        .context("Invalid --token-limit")?;

    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            cli.output_dir.display()
        )
    })?;
    logging::init(
        cli.verbose,
        cli.quiet,
        &cli.output_dir.join(report::LOG_FILE),
    )?;

    let result = run_logged(&cli, pubmed_config, packer_config).await;
    if let Err(err) = &result {
        log::error!("Run failed: {err:#}");
    }
    log::logger().flush();
    result
}

/// The part of a run that happens with the run log installed
async fn run_logged(
    cli: &Cli,
    pubmed_config: PubmedConfig,
    packer_config: PackerConfig,
) -> Result<()> {
    let cost_model = cli.cost_model.as_domain();
    let cost_fn = cost_model
        .build()
        .context("Failed to initialize cost function")?;

    let now = Local::now();
    let query = SearchQuery::new(cli.query.clone(), now.date_naive())
        .years(cli.years)
        .max_results(cli.max_results)
        .review_only(cli.review_only);
    let (date_from, date_to) = query.date_range();

    log::info!("PubMed fetcher initialized at {}", now.format("%Y-%m-%d %H:%M:%S"));
    log::info!("Query: {}", cli.query);
    log::info!("Date range: Last {} year(s) ({date_from} - {date_to})", cli.years);
    log::info!("Max results: {}", cli.max_results);
    log::info!("Review articles only: {}", cli.review_only);
    log::info!("Limit per batch: {} {}", cli.token_limit, cost_fn.unit());
    log::info!("Cost model: {}", cost_fn.name());

    let client = PubmedClient::new(pubmed_config).context("Failed to build PubMed client")?;
    let mut sink = DirectorySink::new(&cli.output_dir);
    let settings = RunSettings {
        query: query.clone(),
        packer: packer_config,
    };

    let outcome = pipeline::run(&client, cost_fn.as_ref(), &mut sink, &settings).await?;
    let RunOutcome::Completed { summary, .. } = outcome else {
        return Ok(());
    };

    let ctx = RunContext {
        query: cli.query.clone(),
        effective_query: query.effective_term(),
        review_only: cli.review_only,
        years: cli.years,
        date_from,
        date_to,
        fetched_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        output_dir: cli.output_dir.display().to_string(),
        cost_model: cost_model.as_str().to_string(),
        cost_unit: cost_fn.unit().to_string(),
        capacity: cli.token_limit,
    };
    let written = report::write_summary(sink.dir(), &summary, &ctx)?;
    log::info!("Summary saved to: {}", written[0].display());

    print_stdout(&report::render_console_summary(&summary, &ctx))?;
    Ok(())
}
