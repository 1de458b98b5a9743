use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

const REVIEW_FILTER: &str = r#" AND "review"[Publication Type]"#;
const DATE_FORMAT: &str = "%Y/%m/%d";

/// A PubMed search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text (supports MeSH terms and field tags)
    pub term: String,

    /// Publication-date window, in years back from `end_date`
    pub years: u32,

    /// Maximum identifiers to retrieve
    pub max_results: usize,

    /// Restrict to review articles
    pub review_only: bool,

    /// Last day of the publication-date window
    pub end_date: NaiveDate,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, end_date: NaiveDate) -> Self {
        Self {
            term: term.into(),
            years: 5,
            max_results: 100,
            review_only: false,
            end_date,
        }
    }

    #[must_use]
    pub const fn years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    #[must_use]
    pub const fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn review_only(mut self, review_only: bool) -> Self {
        self.review_only = review_only;
        self
    }

    /// Term actually sent to esearch
    #[must_use]
    pub fn effective_term(&self) -> String {
        if self.review_only {
            format!("{}{REVIEW_FILTER}", self.term)
        } else {
            self.term.clone()
        }
    }

    /// First day of the window (365 days per year, as NCBI users usually count)
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.end_date
            .checked_sub_days(Days::new(365 * u64::from(self.years)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// `(mindate, maxdate)` formatted for esearch
    #[must_use]
    pub fn date_range(&self) -> (String, String) {
        (
            self.start_date().format(DATE_FORMAT).to_string(),
            self.end_date.format(DATE_FORMAT).to_string(),
        )
    }
}
