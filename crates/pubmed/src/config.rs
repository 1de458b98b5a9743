use crate::error::{PubmedError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Connection settings for the E-utilities client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubmedConfig {
    /// Contact address sent with every request (NCBI requires one)
    pub email: String,

    /// Optional NCBI API key; raises the allowed request rate
    pub api_key: Option<String>,

    /// Tool name sent with every request
    pub tool: String,

    /// E-utilities base URL (overridable for mirrors and tests)
    pub base_url: String,

    /// Identifiers per efetch request
    pub fetch_chunk_size: usize,

    /// Fixed spacing between requests in milliseconds; `None` picks the
    /// NCBI-compliant default for the credentials in use
    pub request_interval_ms: Option<u64>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl PubmedConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: None,
            tool: "litpack".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_chunk_size: 50,
            request_interval_ms: None,
            timeout_secs: 60,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Spacing between consecutive requests.
    ///
    /// NCBI allows 3 requests/second without a key and 10 with one.
    #[must_use]
    pub fn request_interval(&self) -> Duration {
        let ms = self
            .request_interval_ms
            .unwrap_or(if self.api_key.is_some() { 100 } else { 340 });
        Duration::from_millis(ms)
    }

    /// Base URL without a trailing slash
    pub(crate) fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(PubmedError::invalid_config(format!(
                "a contact email is required by NCBI (got '{}')",
                self.email
            )));
        }
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(PubmedError::invalid_config("API key must not be blank"));
            }
        }
        if self.tool.trim().is_empty() {
            return Err(PubmedError::invalid_config("tool name must not be blank"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PubmedError::invalid_config(format!(
                "base URL must be absolute http(s): {}",
                self.base_url
            )));
        }
        if self.fetch_chunk_size == 0 {
            return Err(PubmedError::invalid_config("fetch_chunk_size must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(PubmedError::invalid_config("timeout_secs must be > 0"));
        }
        Ok(())
    }
}
