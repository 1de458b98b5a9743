use thiserror::Error;

/// Result type for batcher operations
pub type Result<T> = std::result::Result<T, BatcherError>;

/// Errors that can occur while costing, packing or summarizing records
#[derive(Error, Debug)]
pub enum BatcherError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The tokenizer could not be loaded or cannot encode text
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// A batch sequence broke the capacity, sum or numbering invariant
    #[error("Batch invariant violated in batch {sequence_number}: {detail}")]
    InvariantViolation {
        sequence_number: usize,
        detail: String,
    },

    /// Batches were handed to the summary out of production order
    #[error("Batch {got} recorded out of order (expected {expected})")]
    OutOfOrderBatch { expected: usize, got: usize },
}

impl BatcherError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    pub(crate) fn invariant(sequence_number: usize, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            sequence_number,
            detail: detail.into(),
        }
    }
}
