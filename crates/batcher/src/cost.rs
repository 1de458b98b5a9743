use crate::error::{BatcherError, Result};
use crate::types::{Cost, CostedRecord, Record};
use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

/// Pluggable cost model used to size records for packing.
///
/// Implementations must be deterministic: the same text always yields the
/// same count, so batch boundaries are reproducible across runs.
pub trait CostFunction: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Cost of `text` in packing units
    fn count_tokens(&self, text: &str) -> usize;

    /// Plural label for the packing unit, as shown in logs and reports
    fn unit(&self) -> &'static str {
        "tokens"
    }

    /// Word and token counts for `text`
    fn measure(&self, text: &str) -> Cost {
        Cost {
            words: count_words(text),
            tokens: self.count_tokens(text),
        }
    }
}

/// Count whitespace-delimited words
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Attach cost annotations to a record (computed over `title + " " + body`)
pub fn cost_record(record: Record, cost_fn: &dyn CostFunction) -> CostedRecord {
    let cost = cost_fn.measure(&record.combined_text());
    CostedRecord::new(record, cost)
}

const PROBE_TEXT: &str = "Tokenizer probe: αβγ 12345 ünïcödé 漢字";

/// Exact BPE token count with the `cl100k_base` vocabulary
pub struct TiktokenCost {
    bpe: CoreBPE,
}

impl TiktokenCost {
    /// Load the `cl100k_base` vocabulary.
    ///
    /// Fails if the vocabulary cannot be loaded or cannot encode a probe
    /// string; callers treat that as a fatal startup error.
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| BatcherError::tokenizer(format!("failed to load cl100k_base: {e}")))?;
        if bpe.encode_ordinary(PROBE_TEXT).is_empty() {
            return Err(BatcherError::tokenizer(
                "cl100k_base produced no tokens for probe text",
            ));
        }
        Ok(Self { bpe })
    }
}

impl CostFunction for TiktokenCost {
    fn name(&self) -> &'static str {
        "tiktoken-cl100k_base"
    }

    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Unicode scalar count
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCountCost;

impl CostFunction for CharCountCost {
    fn name(&self) -> &'static str {
        "chars"
    }

    fn unit(&self) -> &'static str {
        "chars"
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Whitespace word count
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountCost;

impl CostFunction for WordCountCost {
    fn name(&self) -> &'static str {
        "words"
    }

    fn unit(&self) -> &'static str {
        "words"
    }

    fn count_tokens(&self, text: &str) -> usize {
        count_words(text)
    }
}

/// Selectable cost models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// `cl100k_base` BPE tokens (GPT-4 / GPT-3.5-turbo family)
    #[default]
    Tiktoken,

    /// Unicode characters
    Chars,

    /// Whitespace-delimited words
    Words,
}

impl CostModel {
    /// Instantiate the cost function for this model
    pub fn build(self) -> Result<Box<dyn CostFunction>> {
        Ok(match self {
            Self::Tiktoken => Box::new(TiktokenCost::new()?),
            Self::Chars => Box::new(CharCountCost),
            Self::Words => Box::new(WordCountCost),
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiktoken => "tiktoken",
            Self::Chars => "chars",
            Self::Words => "words",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words_splits_on_any_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("one two\tthree\nfour  five"), 5);
    }

    #[test]
    fn test_char_cost_counts_scalars() {
        assert_eq!(CharCountCost.count_tokens("héllo"), 5);
        assert_eq!(CharCountCost.measure("a bc").words, 2);
    }

    #[test]
    fn test_cost_record_uses_title_and_body() {
        let record = Record::new("7", "Deep learning", "for protein folding");
        let costed = cost_record(record, &WordCountCost);
        assert_eq!(costed.cost.words, 5);
        assert_eq!(costed.cost.tokens, 5);
        assert_eq!(costed.record.id, "7");
    }

    #[test]
    fn test_tiktoken_counts_are_deterministic() {
        let cost = TiktokenCost::new().expect("cl100k_base");
        let text = "CRISPR-Cas9 mediated genome editing in human cells.";
        let first = cost.count_tokens(text);
        assert!(first > 0);
        assert_eq!(first, cost.count_tokens(text));
        assert_eq!(cost.count_tokens(""), 0);
    }

    #[test]
    fn test_tiktoken_differs_from_word_count() {
        let cost = TiktokenCost::new().expect("cl100k_base");
        let text = "Immunohistochemical characterization of pseudopapillary neoplasms";
        assert!(cost.count_tokens(text) > count_words(text));
    }

    #[test]
    fn test_cost_model_build() {
        for model in [CostModel::Tiktoken, CostModel::Chars, CostModel::Words] {
            let cost = model.build().expect("cost model");
            assert!(cost.count_tokens("hello world") > 0, "{}", model.as_str());
        }
        assert_eq!(CostModel::Tiktoken.build().unwrap().unit(), "tokens");
        assert_eq!(CharCountCost.unit(), "chars");
        assert_eq!(WordCountCost.unit(), "words");
        assert_eq!(CostModel::default(), CostModel::Tiktoken);
    }
}
