use litpack_batcher::{screen, Rejection};
use litpack_pubmed::parse_article_set;
use pretty_assertions::assert_eq;

const MIXED: &str = include_str!("fixtures/efetch_mixed.xml");

#[test]
fn structured_abstract_parts_are_joined_with_spaces() {
    let items = parse_article_set(MIXED).expect("fixture parses");
    assert_eq!(items.len(), 3);

    let first = items[0].as_ref().expect("first article is complete");
    assert_eq!(first.id, "38100001");
    assert_eq!(
        first.title,
        "Deep learning for protein structure prediction: a review."
    );
    assert_eq!(
        first.body.as_deref(),
        Some(
            "Protein structure prediction has improved. \
             We surveyed AlphaFold and related models. \
             Accuracy now rivals experiment."
        )
    );
}

#[test]
fn nested_comment_pmids_do_not_leak_into_the_record() {
    let items = parse_article_set(MIXED).expect("fixture parses");
    let ids: Vec<_> = items
        .iter()
        .map(|item| match item {
            Ok(candidate) => candidate.id.clone(),
            Err(rejection) => rejection.id().unwrap_or_default().to_string(),
        })
        .collect();
    assert_eq!(ids, vec!["38100001", "38100002", "38100003"]);
}

#[test]
fn character_references_are_decoded() {
    let items = parse_article_set(MIXED).expect("fixture parses");
    let third = items[2].as_ref().expect("third article is complete");
    assert_eq!(third.title, "Cryo-EM meets α-helices & β-sheets.");
}

#[test]
fn quality_filter_drops_the_letter_without_abstract() {
    let screened = screen(parse_article_set(MIXED).expect("fixture parses"));
    let admitted: Vec<_> = screened.admitted.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(admitted, vec!["38100001", "38100003"]);
    assert_eq!(
        screened.rejected,
        vec![Rejection::MissingBody {
            id: "38100002".to_string()
        }]
    );
}
