use crate::error::{BatcherError, Result};
use crate::types::{batch_file_name, Batch, BatchStats, Cost};
use serde::{Deserialize, Serialize};

/// Run-wide counters, threaded through the pipeline as a plain value
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    snapshot: MetricsSnapshot,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an admitted record and its cost
    pub fn admit(&mut self, cost: &Cost) {
        self.snapshot.admitted += 1;
        self.snapshot.words += cost.words;
        self.snapshot.tokens += cost.tokens;
    }

    /// Count a record rejected before packing
    pub fn skip(&mut self) {
        self.snapshot.skipped += 1;
    }

    pub fn skip_many(&mut self, count: usize) {
        self.snapshot.skipped += count;
    }

    /// Read-only copy of the current counters
    #[must_use]
    pub const fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot
    }
}

/// Point-in-time view of [`RunMetrics`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Records that passed the quality filter
    pub admitted: usize,

    /// Records rejected upstream of packing
    pub skipped: usize,

    /// Words across admitted records
    pub words: usize,

    /// Tokens across admitted records
    pub tokens: usize,
}

impl MetricsSnapshot {
    /// Integer mean words per admitted record; `None` when nothing was admitted
    #[must_use]
    pub const fn average_words(&self) -> Option<usize> {
        match self.admitted {
            0 => None,
            n => Some(self.words / n),
        }
    }

    /// Integer mean tokens per admitted record; `None` when nothing was admitted
    #[must_use]
    pub const fn average_tokens(&self) -> Option<usize> {
        match self.admitted {
            0 => None,
            n => Some(self.tokens / n),
        }
    }
}

/// Collects per-batch lines as batches close.
///
/// Batches must be recorded in the order the packer produced them.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    batches: Vec<BatchStats>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_batch(&mut self, batch: &Batch) -> Result<()> {
        let expected = self.batches.len() + 1;
        if batch.sequence_number != expected {
            return Err(BatcherError::OutOfOrderBatch {
                expected,
                got: batch.sequence_number,
            });
        }
        self.batches.push(batch.stats());
        Ok(())
    }

    /// Number of batches recorded so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    #[must_use]
    pub fn finish(self, metrics: MetricsSnapshot) -> RunSummary {
        RunSummary {
            metrics,
            batches: self.batches,
        }
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub metrics: MetricsSnapshot,
    pub batches: Vec<BatchStats>,
}

impl RunSummary {
    /// Build a summary directly from a finished batch sequence
    pub fn from_batches(batches: &[Batch], skipped: usize) -> Result<Self> {
        let mut metrics = RunMetrics::new();
        metrics.skip_many(skipped);
        let mut builder = SummaryBuilder::new();
        for batch in batches {
            builder.record_batch(batch)?;
            for record in &batch.records {
                metrics.admit(&record.cost);
            }
        }
        Ok(builder.finish(metrics.snapshot()))
    }

    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Sum of all batch costs; equals `metrics.tokens` for a consistent run
    #[must_use]
    pub fn batch_token_total(&self) -> usize {
        self.batches.iter().map(|b| b.total_cost).sum()
    }

    /// Batch document names in sequence order
    #[must_use]
    pub fn output_files(&self) -> Vec<String> {
        self.batches
            .iter()
            .map(|b| batch_file_name(b.sequence_number))
            .collect()
    }
}
