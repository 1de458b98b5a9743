use anyhow::{Context as AnyhowContext, Result};
use litpack_batcher::Batch;
use std::fs;
use std::path::{Path, PathBuf};

const RECORD_DELIMITER_WIDTH: usize = 40;

/// Destination for closed batches
pub trait BatchSink {
    /// Persist one batch; returns where it went
    fn write_batch(&mut self, batch: &Batch) -> Result<PathBuf>;
}

/// Writes each batch as `pubmed_batch_{n}.txt` under a directory
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BatchSink for DirectorySink {
    fn write_batch(&mut self, batch: &Batch) -> Result<PathBuf> {
        let path = self.dir.join(batch.file_name());
        fs::write(&path, render_batch(batch))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Plain-text document for one batch: id, title and abstract per record,
/// each followed by a dashed delimiter
pub fn render_batch(batch: &Batch) -> String {
    let delimiter = "-".repeat(RECORD_DELIMITER_WIDTH);
    let mut out = String::new();
    for costed in &batch.records {
        let record = &costed.record;
        out.push_str(&format!("PMID: {}\n\n", record.id));
        out.push_str(&format!("TITLE: {}\n\n", record.title));
        out.push_str(&format!("ABSTRACT:\n{}\n\n", record.body));
        out.push_str(&delimiter);
        out.push_str("\n\n");
    }
    out
}
