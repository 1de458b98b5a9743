use crate::error::{PubmedError, Result};
use serde::{Deserialize, Serialize};

/// Identifiers returned by a search, in relevance order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Total matches reported by PubMed (may exceed `ids.len()`)
    pub total_count: usize,
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    esearchresult: Option<EsearchResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    count: Option<String>,
    #[serde(default)]
    idlist: Vec<String>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

/// Parse an esearch `retmode=json` body
pub fn parse_search_response(body: &str) -> Result<SearchOutcome> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| PubmedError::parse(format!("esearch JSON: {e}")))?;

    if let Some(error) = envelope.error {
        return Err(PubmedError::Api(error));
    }
    let result = envelope
        .esearchresult
        .ok_or_else(|| PubmedError::parse("esearch response has no esearchresult"))?;
    if let Some(error) = result.error {
        return Err(PubmedError::Api(error));
    }

    let total_count = match result.count.as_deref() {
        Some(count) => count
            .trim()
            .parse()
            .map_err(|_| PubmedError::parse(format!("esearch count is not a number: {count}")))?,
        None => result.idlist.len(),
    };

    Ok(SearchOutcome {
        total_count,
        ids: result.idlist,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ids_in_order() {
        let body = r#"{"header":{"type":"esearch","version":"0.3"},
            "esearchresult":{"count":"1234","retmax":"3","retstart":"0",
            "idlist":["39000003","39000001","39000002"]}}"#;
        let outcome = parse_search_response(body).unwrap();
        assert_eq!(outcome.total_count, 1234);
        assert_eq!(outcome.ids, vec!["39000003", "39000001", "39000002"]);
    }

    #[test]
    fn test_parse_empty_result() {
        let body = r#"{"esearchresult":{"count":"0","idlist":[]}}"#;
        let outcome = parse_search_response(body).unwrap();
        assert_eq!(outcome, SearchOutcome::default());
    }

    #[test]
    fn test_api_errors_surface() {
        let body = r#"{"esearchresult":{"ERROR":"Invalid query"}}"#;
        assert!(matches!(parse_search_response(body), Err(PubmedError::Api(msg)) if msg == "Invalid query"));

        let body = r#"{"error":"API rate limit exceeded","count":"11"}"#;
        assert!(matches!(parse_search_response(body), Err(PubmedError::Api(_))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_search_response("<html>oops</html>"),
            Err(PubmedError::Parse(_))
        ));
    }
}
