//! Face analysis through the external computer-vision service.

mod client;
mod error;
pub mod structs;

pub use client::*;
pub use error::*;

use axum::body::Bytes;
use common_types::vision::FaceResult;
use std::future::Future;

/// What an analysis found, once the service answered properly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceAnalysis {
    NoFaces,
    /// Faces in the order the service reported them. Never empty.
    Faces(Vec<FaceResult>),
}

impl FaceAnalysis {
    #[must_use]
    pub fn from_faces(faces: Vec<FaceResult>) -> Self {
        if faces.is_empty() {
            Self::NoFaces
        } else {
            Self::Faces(faces)
        }
    }
}

pub trait FaceAnalyzer {
    /// Runs one analysis of `image`. `label` only identifies the image in logs.
    fn analyze(
        &self,
        image: Bytes,
        label: &str,
    ) -> impl Future<Output = Result<FaceAnalysis, VisionError>> + Send;
}
