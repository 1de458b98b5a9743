use serde::{Deserialize, Serialize};
use std::fmt;

/// A bibliographic record admitted into the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Source identifier (PMID for PubMed); unique and non-empty
    pub id: String,

    /// Article title
    pub title: String,

    /// Body text (the abstract)
    pub body: String,
}

impl Record {
    /// Create a new record
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Text the cost is computed over: `title + " " + body`
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// An entry as extracted by a source, before the quality filter runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body,
        }
    }
}

/// Why a fetched entry never became a [`Record`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The entry carried no body text
    MissingBody { id: String },

    /// The entry lacked required structure
    Malformed { id: Option<String>, detail: String },

    /// The source failed to deliver the entry
    Unavailable { id: String, reason: String },
}

impl Rejection {
    /// Identifier of the rejected entry, when one is known
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::MissingBody { id } | Self::Unavailable { id, .. } => Some(id),
            Self::Malformed { id, .. } => id.as_deref(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody { id } => write!(f, "No abstract for PMID {id} - skipping"),
            Self::Malformed { id: Some(id), detail } => {
                write!(f, "Missing data for article {id} - {detail}")
            }
            Self::Malformed { id: None, detail } => write!(f, "Missing data for article - {detail}"),
            Self::Unavailable { id, reason } => write!(f, "PMID {id} unavailable - {reason}"),
        }
    }
}

/// Cost annotations for one record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cost {
    /// Whitespace-delimited word count
    pub words: usize,

    /// Token count under the configured cost function
    pub tokens: usize,
}

/// A record together with its cost, computed once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostedRecord {
    pub record: Record,
    pub cost: Cost,
}

impl CostedRecord {
    #[must_use]
    pub const fn new(record: Record, cost: Cost) -> Self {
        Self { record, cost }
    }

    #[must_use]
    pub const fn tokens(&self) -> usize {
        self.cost.tokens
    }
}

/// A closed, capacity-bounded run of consecutive records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    /// Position in closing order, starting at 1
    pub sequence_number: usize,

    /// Records in input order
    pub records: Vec<CostedRecord>,

    /// Sum of the records' token costs
    pub total_cost: usize,
}

impl Batch {
    /// Number of records in this batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of the records' word counts
    #[must_use]
    pub fn total_words(&self) -> usize {
        self.records.iter().map(|r| r.cost.words).sum()
    }

    /// Whether this batch honours `capacity`; a lone record may exceed it
    #[must_use]
    pub fn respects_capacity(&self, capacity: usize) -> bool {
        self.total_cost <= capacity || self.records.len() == 1
    }

    /// Output file name for this batch
    #[must_use]
    pub fn file_name(&self) -> String {
        batch_file_name(self.sequence_number)
    }

    #[must_use]
    pub fn stats(&self) -> BatchStats {
        BatchStats::from(self)
    }
}

/// Per-batch line of the run summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchStats {
    pub sequence_number: usize,
    pub record_count: usize,
    pub total_cost: usize,
}

impl From<&Batch> for BatchStats {
    fn from(batch: &Batch) -> Self {
        Self {
            sequence_number: batch.sequence_number,
            record_count: batch.records.len(),
            total_cost: batch.total_cost,
        }
    }
}

/// File name a batch document is written under
#[must_use]
pub fn batch_file_name(sequence_number: usize) -> String {
    format!("pubmed_batch_{sequence_number}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costed(id: &str, tokens: usize) -> CostedRecord {
        CostedRecord::new(
            Record::new(id, "t", "b"),
            Cost {
                words: tokens / 2,
                tokens,
            },
        )
    }

    #[test]
    fn test_combined_text_joins_title_and_body() {
        let record = Record::new("1", "Title", "Body text");
        assert_eq!(record.combined_text(), "Title Body text");
    }

    #[test]
    fn test_batch_capacity_check() {
        let pair = Batch {
            sequence_number: 1,
            records: vec![costed("a", 100), costed("b", 150)],
            total_cost: 250,
        };
        assert!(!pair.respects_capacity(200));
        assert!(pair.respects_capacity(250));

        let lone = Batch {
            sequence_number: 2,
            records: vec![costed("c", 500)],
            total_cost: 500,
        };
        assert!(lone.respects_capacity(200));
    }

    #[test]
    fn test_batch_stats_and_file_name() {
        let batch = Batch {
            sequence_number: 3,
            records: vec![costed("a", 10), costed("b", 20)],
            total_cost: 30,
        };
        let stats = batch.stats();
        assert_eq!(stats.sequence_number, 3);
        assert_eq!(stats.record_count, 2);
        assert_eq!(stats.total_cost, 30);
        assert_eq!(batch.total_words(), 15);
        assert_eq!(batch.file_name(), "pubmed_batch_3.txt");
    }

    #[test]
    fn test_rejection_display_and_id() {
        let missing = Rejection::MissingBody { id: "42".into() };
        assert_eq!(missing.id(), Some("42"));
        assert_eq!(missing.to_string(), "No abstract for PMID 42 - skipping");

        let malformed = Rejection::Malformed {
            id: None,
            detail: "PMID".into(),
        };
        assert_eq!(malformed.id(), None);
        assert!(malformed.to_string().contains("PMID"));
    }
}
