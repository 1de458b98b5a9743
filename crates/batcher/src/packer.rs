use crate::config::PackerConfig;
use crate::error::{BatcherError, Result};
use crate::types::{Batch, CostedRecord};

/// Greedy, order-preserving batch packer.
///
/// Records are appended to the open batch until the next one would push its
/// cost past capacity; the open batch is then closed and the record starts a
/// new one. Landing exactly on capacity is allowed. A record that alone
/// exceeds capacity is never split and ends up in a batch of its own.
pub struct Packer {
    config: PackerConfig,
    open: Vec<CostedRecord>,
    open_cost: usize,
    next_sequence: usize,
}

impl Packer {
    /// Create a packer, rejecting an unusable configuration
    pub fn new(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            open: Vec::new(),
            open_cost: 0,
            next_sequence: 1,
        })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Token cost accumulated in the open batch
    #[must_use]
    pub const fn open_cost(&self) -> usize {
        self.open_cost
    }

    /// Number of records in the open batch
    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Sequence number the open batch will be closed under
    #[must_use]
    pub const fn next_sequence(&self) -> usize {
        self.next_sequence
    }

    /// Feed the next record; returns the batch it caused to close, if any
    pub fn push(&mut self, record: CostedRecord) -> Option<Batch> {
        let tokens = record.tokens();
        let overflows = self.open_cost.saturating_add(tokens) > self.config.capacity;

        if overflows && !self.open.is_empty() {
            let closed = self.close();
            self.open.push(record);
            self.open_cost = tokens;
            return Some(closed);
        }

        self.open.push(record);
        self.open_cost = self.open_cost.saturating_add(tokens);
        None
    }

    /// Close the trailing batch, if it holds anything
    pub fn finish(mut self) -> Option<Batch> {
        if self.open.is_empty() {
            None
        } else {
            Some(self.close())
        }
    }

    fn close(&mut self) -> Batch {
        let batch = Batch {
            sequence_number: self.next_sequence,
            records: std::mem::take(&mut self.open),
            total_cost: self.open_cost,
        };
        debug_assert!(batch.respects_capacity(self.config.capacity));
        self.next_sequence += 1;
        self.open_cost = 0;
        batch
    }
}

/// Pack `records` into batches of at most `capacity` tokens
pub fn pack(records: impl IntoIterator<Item = CostedRecord>, capacity: usize) -> Result<Vec<Batch>> {
    let mut packer = Packer::new(PackerConfig::with_capacity(capacity))?;
    let mut batches: Vec<Batch> = records
        .into_iter()
        .filter_map(|record| packer.push(record))
        .collect();
    batches.extend(packer.finish());
    Ok(batches)
}

/// Verify numbering, cost sums and the capacity rule over a batch sequence
pub fn check_batches(batches: &[Batch], capacity: usize) -> Result<()> {
    for (idx, batch) in batches.iter().enumerate() {
        let n = batch.sequence_number;
        if n != idx + 1 {
            return Err(BatcherError::invariant(
                n,
                format!("expected sequence number {}", idx + 1),
            ));
        }
        if batch.records.is_empty() {
            return Err(BatcherError::invariant(n, "batch is empty"));
        }
        let sum: usize = batch.records.iter().map(CostedRecord::tokens).sum();
        if sum != batch.total_cost {
            return Err(BatcherError::invariant(
                n,
                format!("total_cost {} != record sum {sum}", batch.total_cost),
            ));
        }
        if !batch.respects_capacity(capacity) {
            return Err(BatcherError::invariant(
                n,
                format!(
                    "{} records cost {} tokens, over capacity {capacity}",
                    batch.records.len(),
                    batch.total_cost
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cost, Record};
    use pretty_assertions::assert_eq;

    fn costed(id: &str, tokens: usize) -> CostedRecord {
        CostedRecord::new(Record::new(id, "", ""), Cost { words: 0, tokens })
    }

    fn ids(batch: &Batch) -> Vec<&str> {
        batch.records.iter().map(|r| r.record.id.as_str()).collect()
    }

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(Packer::new(PackerConfig::with_capacity(0)).is_err());
        assert!(pack(Vec::new(), 0).is_err());
    }

    #[test]
    fn test_push_reports_closed_batch() {
        let mut packer = Packer::new(PackerConfig::with_capacity(10)).unwrap();
        assert!(packer.push(costed("a", 6)).is_none());
        assert_eq!(packer.open_cost(), 6);

        let closed = packer.push(costed("b", 5)).expect("a closes");
        assert_eq!(closed.sequence_number, 1);
        assert_eq!(ids(&closed), vec!["a"]);
        assert_eq!(packer.open_len(), 1);
        assert_eq!(packer.open_cost(), 5);
        assert_eq!(packer.next_sequence(), 2);

        let last = packer.finish().expect("b remains");
        assert_eq!(last.sequence_number, 2);
        assert_eq!(last.total_cost, 5);
    }

    #[test]
    fn test_exact_fit_stays_in_batch() {
        let batches = pack(vec![costed("a", 4), costed("b", 6)], 10).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].total_cost, 10);
    }

    #[test]
    fn test_oversized_record_after_open_batch() {
        let batches = pack(vec![costed("a", 3), costed("b", 50), costed("c", 3)], 10).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(ids(&batches[1]), vec!["b"]);
        assert_eq!(batches[1].total_cost, 50);
        check_batches(&batches, 10).unwrap();
    }

    #[test]
    fn test_zero_cost_records_never_overflow() {
        let batches = pack(vec![costed("a", 10), costed("b", 0), costed("c", 0)], 10).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn test_check_batches_flags_violations() {
        let mut batches = pack(vec![costed("a", 5), costed("b", 5)], 5).unwrap();
        check_batches(&batches, 5).unwrap();

        batches[1].sequence_number = 7;
        assert!(matches!(
            check_batches(&batches, 5),
            Err(BatcherError::InvariantViolation {
                sequence_number: 7,
                ..
            })
        ));

        batches[1].sequence_number = 2;
        batches[1].total_cost = 4;
        assert!(check_batches(&batches, 5).is_err());

        let merged = Batch {
            sequence_number: 1,
            records: vec![costed("a", 5), costed("b", 5)],
            total_cost: 10,
        };
        assert!(check_batches(&[merged], 5).is_err());
    }
}
