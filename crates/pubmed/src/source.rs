use crate::error::Result;
use crate::esearch::SearchOutcome;
use crate::query::SearchQuery;
use async_trait::async_trait;
use litpack_batcher::{Candidate, Rejection};

/// Everything a fetch produced, in search relevance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub items: Vec<std::result::Result<Candidate, Rejection>>,
}

impl FetchReport {
    #[must_use]
    pub fn candidates(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    #[must_use]
    pub fn rejections(&self) -> usize {
        self.items.len() - self.candidates()
    }
}

/// A remote literature database that can be searched and fetched from
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Identifiers matching `query`, most relevant first
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome>;

    /// Fetch records for `ids`.
    ///
    /// Never fails as a whole: identifiers from a request that failed come
    /// back as [`Rejection::Unavailable`] so the caller can count them.
    async fn fetch(&self, ids: &[String]) -> FetchReport;
}
