use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),
    #[error("Stage error: {0}")]
    StageError(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
