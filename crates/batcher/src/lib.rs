//! # litpack batcher
//!
//! Token-aware packing of bibliographic records into context-sized batches.
//!
//! ## Philosophy
//!
//! Batches are built for a downstream language model with a fixed context
//! budget, so the packer:
//! - Never reorders records (relevance order from the source is preserved)
//! - Never splits a record (an oversized record travels alone)
//! - Measures size with the model's own tokenizer, not bytes or words
//! - Stays free of I/O so every boundary decision is unit-testable
//!
//! ## Architecture
//!
//! ```text
//! Candidate (from a source)
//!     │
//!     ├──> Quality filter → Record | Rejection
//!     │
//!     ├──> CostFunction (tiktoken / chars / words) → CostedRecord
//!     │
//!     ├──> Packer (greedy, single pass)
//!     │    └─> Batch #1, Batch #2, ...
//!     │
//!     └──> RunMetrics + SummaryBuilder → RunSummary
//! ```
//!
//! ## Example
//!
//! ```rust
//! use litpack_batcher::{cost_record, pack, Record, WordCountCost};
//!
//! let cost = WordCountCost;
//! let records = vec![
//!     cost_record(Record::new("1", "Alpha", "one two three"), &cost),
//!     cost_record(Record::new("2", "Beta", "four five"), &cost),
//! ];
//!
//! let batches = pack(records, 5).unwrap();
//! assert_eq!(batches.len(), 2);
//! assert_eq!(batches[0].sequence_number, 1);
//! ```

mod config;
mod cost;
mod error;
mod filter;
mod metrics;
mod packer;
mod types;

pub use config::PackerConfig;
pub use cost::{
    cost_record, count_words, CharCountCost, CostFunction, CostModel, TiktokenCost,
    WordCountCost,
};
pub use error::{BatcherError, Result};
pub use filter::{admit, screen, Screened};
pub use metrics::{MetricsSnapshot, RunMetrics, RunSummary, SummaryBuilder};
pub use packer::{check_batches, pack, Packer};
pub use types::{
    batch_file_name, Batch, BatchStats, Candidate, Cost, CostedRecord, Record, Rejection,
};
