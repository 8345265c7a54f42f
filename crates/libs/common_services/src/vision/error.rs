use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Invalid vision endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Vision service unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("Vision service returned {status}: {message}")]
    Service {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    #[error("Vision service returned a malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}
