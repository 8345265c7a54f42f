//! Blob storage: uploads into one container and signs time-limited URLs for the results.

mod client;
mod error;
pub mod sas;

pub use client::*;
pub use error::*;

use axum::body::Bytes;
use chrono::{DateTime, Duration, Utc};
use sas::SignedBlobUrl;
use std::future::Future;

/// How long the URL handed back to the uploader stays readable.
pub const READ_URL_VALIDITY: Duration = Duration::minutes(30);

/// Where uploaded photos go.
pub trait BlobStore {
    /// Writes `bytes` as a block blob named `blob_name`, replacing any existing blob.
    fn upload(
        &self,
        blob_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Builds a read-only URL for `blob_name` that expires [`READ_URL_VALIDITY`] after `now`.
    fn read_url(&self, blob_name: &str, now: DateTime<Utc>)
    -> Result<SignedBlobUrl, StorageError>;
}
