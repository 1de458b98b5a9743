//! # litpack PubMed source
//!
//! Searches PubMed through NCBI E-utilities and fetches titles and abstracts
//! as [`litpack_batcher::Candidate`]s, keeping the relevance order esearch
//! returned.
//!
//! ```text
//! SearchQuery ──esearch──> [PMID, ...] ──efetch (chunks of 50, paced)──> FetchReport
//! ```
//!
//! Requests are spaced by a fixed interval (340 ms, or 100 ms with an API
//! key) so a run stays under NCBI's published rate limits.

mod client;
mod config;
mod efetch;
mod error;
mod esearch;
mod pacer;
mod query;
mod source;

pub use client::PubmedClient;
pub use config::{PubmedConfig, DEFAULT_BASE_URL};
pub use efetch::parse_article_set;
pub use error::{PubmedError, Result};
pub use esearch::{parse_search_response, SearchOutcome};
pub use pacer::Pacer;
pub use query::SearchQuery;
pub use source::{FetchReport, ItemSource};
