use crate::sink::BatchSink;
use anyhow::Result;
use litpack_batcher::{
    cost_record, screen, Batch, CostFunction, MetricsSnapshot, Packer, PackerConfig, RunMetrics,
    RunSummary, SummaryBuilder,
};
use litpack_pubmed::{ItemSource, SearchQuery};
use std::path::PathBuf;

const PROGRESS_EVERY: usize = 10;

/// Inputs of a single run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub query: SearchQuery,
    pub packer: PackerConfig,
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The search matched nothing (or failed)
    NoMatches,

    /// Records were found but none survived the quality filter
    NoUsableRecords { metrics: MetricsSnapshot },

    /// Batches were written
    Completed {
        summary: RunSummary,
        batch_files: Vec<PathBuf>,
    },
}

fn banner(title: &str) {
    log::info!("{}", "=".repeat(60));
    log::info!("{title}");
    log::info!("{}", "=".repeat(60));
}

/// Search, fetch, filter, cost, pack and hand every closed batch to `sink`.
///
/// Per-record and per-request failures are logged and counted as skipped;
/// only sink failures abort the run.
pub async fn run(
    source: &dyn ItemSource,
    cost_fn: &dyn CostFunction,
    sink: &mut dyn BatchSink,
    settings: &RunSettings,
) -> Result<RunOutcome> {
    let mut packer = Packer::new(settings.packer)?;

    banner("SEARCHING PUBMED...");
    log::info!("Effective query: {}", settings.query.effective_term());
    let ids = match source.search(&settings.query).await {
        Ok(outcome) => {
            log::info!("Total articles found: {}", outcome.total_count);
            log::info!("Retrieving: {} articles", outcome.ids.len());
            outcome.ids
        }
        Err(e) => {
            log::error!("ERROR during search: {e}");
            Vec::new()
        }
    };
    if ids.is_empty() {
        log::info!("No results found. Exiting.");
        return Ok(RunOutcome::NoMatches);
    }

    banner("FETCHING ARTICLE DETAILS...");
    let report = source.fetch(&ids).await;
    let screened = screen(report.items);

    let mut metrics = RunMetrics::new();
    for rejection in &screened.rejected {
        log::warn!("{rejection}");
    }
    metrics.skip_many(screened.rejected.len());

    log::info!("Successfully fetched: {} articles", screened.admitted.len());
    log::info!("Skipped: {} articles", screened.rejected.len());
    if screened.admitted.is_empty() {
        log::info!("No articles fetched. Exiting.");
        return Ok(RunOutcome::NoUsableRecords {
            metrics: metrics.snapshot(),
        });
    }

    banner("PROCESSING ARTICLES AND CREATING BATCHES...");
    log::debug!(
        "Packing with {} at {} {} per batch",
        cost_fn.name(),
        packer.capacity(),
        cost_fn.unit()
    );
    let total = screened.admitted.len();
    let mut builder = SummaryBuilder::new();
    let mut batch_files = Vec::new();

    for (idx, record) in screened.admitted.into_iter().enumerate() {
        let costed = cost_record(record, cost_fn);
        metrics.admit(&costed.cost);
        if let Some(batch) = packer.push(costed) {
            batch_files.push(close_batch(sink, &mut builder, &batch, cost_fn.unit())?);
        }
        let processed = idx + 1;
        if processed % PROGRESS_EVERY == 0 {
            log::info!("Processed {processed}/{total} articles");
        }
    }
    if let Some(batch) = packer.finish() {
        batch_files.push(close_batch(sink, &mut builder, &batch, cost_fn.unit())?);
    }

    Ok(RunOutcome::Completed {
        summary: builder.finish(metrics.snapshot()),
        batch_files,
    })
}

fn close_batch(
    sink: &mut dyn BatchSink,
    builder: &mut SummaryBuilder,
    batch: &Batch,
    unit: &str,
) -> Result<PathBuf> {
    let path = sink.write_batch(batch)?;
    builder.record_batch(batch)?;
    log::info!(
        "Saved batch {}: {} articles, {} {unit} -> {}",
        batch.sequence_number,
        batch.len(),
        batch.total_cost,
        path.display()
    );
    Ok(path)
}
