//! Extraction of title and abstract from efetch `PubmedArticleSet` XML.

use crate::error::{PubmedError, Result};
use litpack_batcher::{Candidate, Rejection};
use quick_xml::events::Event;
use quick_xml::Reader;

const PMID_PATH: &[&str] = &["MedlineCitation", "PMID"];
const TITLE_PATH: &[&str] = &["MedlineCitation", "Article", "ArticleTitle"];
const ABSTRACT_PATH: &[&str] = &["MedlineCitation", "Article", "Abstract"];
const ABSTRACT_TEXT_PATH: &[&str] = &["MedlineCitation", "Article", "Abstract", "AbstractText"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    AbstractPart,
}

#[derive(Debug, Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: Option<String>,
    has_abstract: bool,
    abstract_parts: Vec<String>,
    /// First text node that could not be decoded
    error: Option<String>,
}

impl ArticleBuilder {
    fn buffer(&mut self, field: Field) -> &mut String {
        match field {
            Field::Pmid => self.pmid.get_or_insert_with(String::new),
            Field::Title => self.title.get_or_insert_with(String::new),
            Field::AbstractPart => {
                if self.abstract_parts.is_empty() {
                    self.abstract_parts.push(String::new());
                }
                let last = self.abstract_parts.len() - 1;
                &mut self.abstract_parts[last]
            }
        }
    }

    fn build(self) -> std::result::Result<Candidate, Rejection> {
        let pmid = self
            .pmid
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let Some(pmid) = pmid else {
            return Err(Rejection::Malformed {
                id: None,
                detail: "missing MedlineCitation/PMID".to_string(),
            });
        };
        if let Some(detail) = self.error {
            return Err(Rejection::Malformed {
                id: Some(pmid),
                detail,
            });
        }
        let Some(title) = self.title else {
            return Err(Rejection::Malformed {
                id: Some(pmid),
                detail: "missing ArticleTitle".to_string(),
            });
        };
        let body = if self.has_abstract && !self.abstract_parts.is_empty() {
            let parts: Vec<&str> = self.abstract_parts.iter().map(|p| p.trim()).collect();
            Some(parts.join(" "))
        } else {
            None
        };
        Ok(Candidate::new(pmid, title.trim(), body))
    }
}

fn field_for(rel: &[String]) -> Option<Field> {
    if rel == PMID_PATH {
        Some(Field::Pmid)
    } else if rel == TITLE_PATH {
        Some(Field::Title)
    } else if rel == ABSTRACT_TEXT_PATH {
        Some(Field::AbstractPart)
    } else {
        None
    }
}

/// Parse an efetch response into one entry per `PubmedArticle`, in document order.
///
/// Text inside inline markup (`<i>`, `<sup>`, ...) is kept; the markup is
/// dropped. Structured abstracts are joined with a single space.
pub fn parse_article_set(xml: &str) -> Result<Vec<std::result::Result<Candidate, Rejection>>> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut items = Vec::new();

    // (depth of the PubmedArticle element, builder)
    let mut article: Option<(usize, ArticleBuilder)> = None;
    // (depth of the captured element, field)
    let mut capture: Option<(usize, Field)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            PubmedError::parse(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                path.push(name);
                let depth = path.len();

                if path[depth - 1] == "PubmedArticle" && article.is_none() {
                    article = Some((depth, ArticleBuilder::default()));
                    continue;
                }
                let Some((article_depth, builder)) = article.as_mut() else {
                    continue;
                };
                if capture.is_some() {
                    continue;
                }
                let rel = &path[*article_depth..];
                if rel == ABSTRACT_PATH {
                    builder.has_abstract = true;
                } else if let Some(field) = field_for(rel) {
                    if field == Field::AbstractPart {
                        builder.abstract_parts.push(String::new());
                    }
                    builder.buffer(field).clear();
                    capture = Some((depth, field));
                }
            }
            Event::Empty(empty) => {
                let Some((article_depth, builder)) = article.as_mut() else {
                    continue;
                };
                if capture.is_some() {
                    continue;
                }
                let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                let mut rel: Vec<String> = path[*article_depth..].to_vec();
                rel.push(name);
                if rel == ABSTRACT_PATH {
                    builder.has_abstract = true;
                } else if let Some(field) = field_for(&rel) {
                    if field == Field::AbstractPart {
                        builder.abstract_parts.push(String::new());
                    } else {
                        builder.buffer(field).clear();
                    }
                }
            }
            Event::Text(text) => {
                if let (Some((_, builder)), Some((_, field))) = (article.as_mut(), capture) {
                    match text.unescape() {
                        Ok(text) => builder.buffer(field).push_str(&text),
                        Err(e) if builder.error.is_none() => {
                            builder.error = Some(format!("undecodable {field:?} text: {e}"));
                        }
                        Err(_) => {}
                    }
                }
            }
            Event::CData(data) => {
                if let (Some((_, builder)), Some((_, field))) = (article.as_mut(), capture) {
                    let raw = data.into_inner();
                    builder.buffer(field).push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::End(_) => {
                let depth = path.len();
                if matches!(capture, Some((capture_depth, _)) if capture_depth == depth) {
                    capture = None;
                }
                if matches!(article, Some((article_depth, _)) if article_depth == depth) {
                    if let Some((_, builder)) = article.take() {
                        items.push(builder.build());
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}
