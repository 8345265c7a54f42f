use common_types::vision::FaceResult;
use serde::Deserialize;

/// Body of a successful `analyze` call. Only the parts this app looks at are modelled.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAnalysis {
    pub faces: Vec<FaceDescription>,
    pub tags: Vec<ImageTag>,
    pub description: Option<ImageDescription>,
    pub adult: Option<AdultInfo>,
    pub objects: Vec<DetectedObject>,
    pub brands: Vec<DetectedBrand>,
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDescription {
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    pub face_rectangle: FaceRectangle,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FaceRectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Deserialize)]
pub struct ImageTag {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImageDescription {
    pub tags: Vec<String>,
    pub captions: Vec<ImageCaption>,
}

#[derive(Debug, Deserialize)]
pub struct ImageCaption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdultInfo {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub adult_score: f64,
    pub racy_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct DetectedObject {
    pub object: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
pub struct DetectedBrand {
    pub name: String,
    pub confidence: f64,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub error: Option<NestedServiceError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NestedServiceError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// Code and message, whichever of the flat or nested layouts the service used.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self.error {
            Some(nested) => (nested.code.or(self.code), nested.message.or(self.message)),
            None => (self.code, self.message),
        }
    }
}

impl From<&FaceDescription> for FaceResult {
    fn from(face: &FaceDescription) -> Self {
        let rect = face.face_rectangle;
        Self {
            gender: face.gender.clone().unwrap_or_default(),
            age: face.age.unwrap_or_default(),
            coordinates: [
                rect.left,
                rect.top,
                rect.left.saturating_add(rect.width),
                rect.top.saturating_add(rect.height),
            ],
        }
    }
}

impl ImageAnalysis {
    /// Reshapes the detected faces, keeping the service's order.
    #[must_use]
    pub fn face_results(&self) -> Vec<FaceResult> {
        self.faces.iter().map(FaceResult::from).collect()
    }
}
