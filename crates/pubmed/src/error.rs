use thiserror::Error;

pub type Result<T> = std::result::Result<T, PubmedError>;

#[derive(Error, Debug)]
pub enum PubmedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("E-utilities returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("E-utilities error: {0}")]
    Api(String),

    #[error("Failed to parse E-utilities response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PubmedError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
