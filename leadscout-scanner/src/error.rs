use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Site unreachable: {url} answered with status {status}")]
    Unreachable { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, ScanError>;
