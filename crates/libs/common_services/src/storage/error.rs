use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage account key is not valid base64: {0}")]
    InvalidAccountKey(#[from] base64::DecodeError),

    #[error("Could not sign storage request: {0}")]
    Signing(String),

    #[error("Invalid blob url: {0}")]
    InvalidUrl(String),

    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage service returned {status}: {message}")]
    Service { status: StatusCode, message: String },
}
