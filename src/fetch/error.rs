use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
