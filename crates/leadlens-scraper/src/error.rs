use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out fetching {url} after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("query must not be empty or blank")]
    EmptyQuery,
}
