use crate::config::PubmedConfig;
use crate::efetch::parse_article_set;
use crate::error::{PubmedError, Result};
use crate::esearch::{parse_search_response, SearchOutcome};
use crate::pacer::Pacer;
use crate::query::SearchQuery;
use crate::source::{FetchReport, ItemSource};
use async_trait::async_trait;
use litpack_batcher::{Candidate, Rejection};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

type Item = std::result::Result<Candidate, Rejection>;

/// NCBI E-utilities client (esearch + efetch against `db=pubmed`)
pub struct PubmedClient {
    http: Client,
    config: PubmedConfig,
    pacer: Mutex<Pacer>,
}

impl PubmedClient {
    pub fn new(config: PubmedConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .user_agent(format!("{}/{}", config.tool, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let pacer = Mutex::new(Pacer::new(config.request_interval()));
        Ok(Self {
            http,
            config,
            pacer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PubmedConfig {
        &self.config
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("tool", self.config.tool.clone()),
            ("email", self.config.email.clone()),
        ];
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    async fn get(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<String> {
        self.pacer.lock().await.wait().await;
        let url = self.config.endpoint(endpoint);
        log::debug!("GET {url}");
        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PubmedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }

    /// Run esearch for `query`
    pub async fn esearch(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let (mindate, maxdate) = query.date_range();
        let mut params = self.common_params();
        params.extend([
            ("term", query.effective_term()),
            ("mindate", mindate),
            ("maxdate", maxdate),
            ("datetype", "pdat".to_string()),
            ("retmax", query.max_results.to_string()),
            ("retmode", "json".to_string()),
        ]);
        let body = self.get("esearch.fcgi", &params).await?;
        parse_search_response(&body)
    }

    /// Run a single efetch for `ids`, returning entries in requested order
    pub async fn efetch_chunk(&self, ids: &[String]) -> Result<Vec<Item>> {
        let mut params = self.common_params();
        params.extend([
            ("id", ids.join(",")),
            ("rettype", "xml".to_string()),
            ("retmode", "xml".to_string()),
        ]);
        let body = self.get("efetch.fcgi", &params).await?;
        let parsed = parse_article_set(&body)?;
        Ok(order_by_request(ids, parsed))
    }
}

/// Reorder parsed entries to follow `ids`; ids that did not come back are
/// reported as unavailable, entries without an id go last
fn order_by_request(ids: &[String], parsed: Vec<Item>) -> Vec<Item> {
    let mut by_id: HashMap<String, Item> = HashMap::new();
    let mut anonymous = Vec::new();
    for item in parsed {
        let id = match &item {
            Ok(candidate) => Some(candidate.id.clone()),
            Err(rejection) => rejection.id().map(str::to_string),
        };
        match id {
            Some(id) => {
                by_id.entry(id).or_insert(item);
            }
            None => anonymous.push(item),
        }
    }

    let mut ordered: Vec<Item> = ids
        .iter()
        .map(|id| {
            by_id.remove(id).unwrap_or_else(|| {
                Err(Rejection::Unavailable {
                    id: id.clone(),
                    reason: "not present in efetch response".to_string(),
                })
            })
        })
        .collect();
    ordered.extend(anonymous);
    ordered
}

#[async_trait]
impl ItemSource for PubmedClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        self.esearch(query).await
    }

    async fn fetch(&self, ids: &[String]) -> FetchReport {
        let chunk_size = self.config.fetch_chunk_size;
        let mut report = FetchReport::default();

        for (chunk_idx, chunk) in ids.chunks(chunk_size).enumerate() {
            match self.efetch_chunk(chunk).await {
                Ok(items) => report.items.extend(items),
                Err(e) => {
                    log::error!("ERROR fetching batch {}: {e}", chunk_idx + 1);
                    let reason = e.to_string();
                    report
                        .items
                        .extend(chunk.iter().map(|id| {
                            Err(Rejection::Unavailable {
                                id: id.clone(),
                                reason: reason.clone(),
                            })
                        }));
                    continue;
                }
            }
            let processed = (chunk_idx * chunk_size + chunk.len()).min(ids.len());
            log::info!("Processed {processed}/{} articles", ids.len());
        }

        report
    }
}
