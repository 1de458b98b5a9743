use clap::ValueEnum;
use litpack_batcher::CostModel;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum CostModelFlag {
    /// cl100k_base BPE tokens
    Tiktoken,
    /// Unicode characters
    Chars,
    /// Whitespace-delimited words
    Words,
}

impl CostModelFlag {
    pub(crate) const fn as_domain(self) -> CostModel {
        match self {
            CostModelFlag::Tiktoken => CostModel::Tiktoken,
            CostModelFlag::Chars => CostModel::Chars,
            CostModelFlag::Words => CostModel::Words,
        }
    }
}
