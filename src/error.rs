use thiserror::Error;

/// A form was submitted with missing or malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Failures talking to the Hugging Face Hub or decoding what it returns.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url}: HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("{0}: invalid or missing access token")]
    Unauthorized(String),

    #[error("a token is required for this action")]
    MissingToken,

    #[error("no splits found for dataset '{0}'")]
    NoSplits(String),

    #[error("split '{split}' not found in dataset '{dataset}' (available: {available})")]
    UnknownSplit {
        dataset: String,
        split: String,
        available: String,
    },

    #[error("shard {file} has a different schema than the first shard")]
    SchemaMismatch { file: String },

    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("saving token: {0}")]
    Io(#[from] std::io::Error),
}
