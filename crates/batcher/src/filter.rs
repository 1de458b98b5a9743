use crate::types::{Candidate, Record, Rejection};

/// Outcome of screening a fetched sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screened {
    /// Admitted records, in input order
    pub admitted: Vec<Record>,

    /// Rejected entries, in input order
    pub rejected: Vec<Rejection>,
}

/// Admit a candidate only if it has an identifier and non-blank body text
pub fn admit(candidate: Candidate) -> Result<Record, Rejection> {
    let Candidate { id, title, body } = candidate;
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(Rejection::Malformed {
            id: None,
            detail: "empty identifier".to_string(),
        });
    }
    match body {
        Some(body) if !body.trim().is_empty() => Ok(Record { id, title, body }),
        _ => Err(Rejection::MissingBody { id }),
    }
}

/// Run the quality filter over everything a source produced.
///
/// Entries the source already rejected pass straight through to `rejected`.
pub fn screen<I>(items: I) -> Screened
where
    I: IntoIterator<Item = Result<Candidate, Rejection>>,
{
    let mut screened = Screened::default();
    for item in items {
        match item.and_then(admit) {
            Ok(record) => screened.admitted.push(record),
            Err(rejection) => screened.rejected.push(rejection),
        }
    }
    screened
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_admit_requires_body() {
        let ok = admit(Candidate::new("1", "T", Some("abstract".into()))).unwrap();
        assert_eq!(ok, Record::new("1", "T", "abstract"));

        assert_eq!(
            admit(Candidate::new("2", "T", None)).unwrap_err(),
            Rejection::MissingBody { id: "2".into() }
        );
        assert_eq!(
            admit(Candidate::new("3", "T", Some("  \n ".into()))).unwrap_err(),
            Rejection::MissingBody { id: "3".into() }
        );
    }

    #[test]
    fn test_admit_requires_identifier() {
        let err = admit(Candidate::new(" ", "T", Some("b".into()))).unwrap_err();
        assert!(matches!(err, Rejection::Malformed { id: None, .. }));
    }

    #[test]
    fn test_admit_keeps_empty_title() {
        let record = admit(Candidate::new("9", "", Some("body".into()))).unwrap();
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_screen_preserves_order_and_passes_rejections() {
        let items = vec![
            Ok(Candidate::new("1", "a", Some("x".into()))),
            Err(Rejection::Unavailable {
                id: "2".into(),
                reason: "timeout".into(),
            }),
            Ok(Candidate::new("3", "c", None)),
            Ok(Candidate::new("4", "d", Some("y".into()))),
        ];
        let screened = screen(items);
        let ids: Vec<_> = screened.admitted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(screened.rejected.len(), 2);
        assert_eq!(screened.rejected[0].id(), Some("2"));
        assert_eq!(screened.rejected[1], Rejection::MissingBody { id: "3".into() });
    }
}
