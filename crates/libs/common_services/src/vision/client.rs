use crate::vision::structs::{ImageAnalysis, ServiceErrorBody};
use crate::vision::{FaceAnalysis, FaceAnalyzer, VisionError};
use app_state::VisionSettings;
use axum::body::Bytes;
use common_types::vision::VisualFeature;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

const ANALYZE_PATH: [&str; 3] = ["vision", "v3.2", "analyze"];
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the image analysis endpoint of the computer-vision service.
#[derive(Clone, Debug)]
pub struct VisionClient {
    http_client: Client,
    analyze_url: Url,
    subscription_key: String,
}

impl VisionClient {
    /// # Errors
    ///
    /// * `VisionError::InvalidEndpoint` if the endpoint can't hold a path.
    /// * `VisionError::Unavailable` if the HTTP client can't be built.
    pub fn new(settings: &VisionSettings) -> Result<Self, VisionError> {
        let http_client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http_client,
            analyze_url: analyze_url(&settings.endpoint, &settings.features)?,
            subscription_key: settings.subscription_key.clone(),
        })
    }

    /// Sends the raw image bytes and decodes the analysis.
    ///
    /// # Errors
    /// * If the request can't be sent or times out.
    /// * If the service answers with a non-success status.
    /// * If the body isn't a valid analysis.
    pub async fn analyze_image(&self, image: Bytes) -> Result<ImageAnalysis, VisionError> {
        let response = self
            .http_client
            .post(self.analyze_url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let (code, message) = serde_json::from_slice::<ServiceErrorBody>(&body)
                .map(ServiceErrorBody::into_parts)
                .unwrap_or_default();
            return Err(VisionError::Service {
                status,
                code,
                message: message.unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned()),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

impl FaceAnalyzer for VisionClient {
    async fn analyze(&self, image: Bytes, label: &str) -> Result<FaceAnalysis, VisionError> {
        let analysis = self.analyze_image(image).await?;
        let faces = analysis.face_results();
        info!(
            request_id = analysis.request_id.as_deref().unwrap_or_default(),
            "Analyzed {label}: {} face(s) found",
            faces.len()
        );
        log_summary(label, &analysis);

        Ok(FaceAnalysis::from_faces(faces))
    }
}

/// Everything the service saw besides faces, at debug level.
fn log_summary(label: &str, analysis: &ImageAnalysis) {
    if let Some(description) = &analysis.description {
        for caption in &description.captions {
            debug!(
                "Caption for {label}: {} ({:.2})",
                caption.text, caption.confidence
            );
        }
    }
    let tags: Vec<&str> = analysis.tags.iter().map(|t| t.name.as_str()).collect();
    debug!("Tags for {label}: {}", tags.join(", "));

    if let Some(adult) = &analysis.adult {
        debug!(
            "Adult content in {label}: {} ({:.2}), racy: {} ({:.2})",
            adult.is_adult_content, adult.adult_score, adult.is_racy_content, adult.racy_score
        );
    }
    for object in &analysis.objects {
        debug!(
            "Object in {label}: {} ({:.2})",
            object.object, object.confidence
        );
    }
    for brand in &analysis.brands {
        debug!("Brand in {label}: {} ({:.2})", brand.name, brand.confidence);
    }
}

fn analyze_url(endpoint: &Url, features: &[VisualFeature]) -> Result<Url, VisionError> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| VisionError::InvalidEndpoint(endpoint.to_string()))?
        .pop_if_empty()
        .extend(ANALYZE_PATH);

    let features = features
        .iter()
        .map(|feature| feature.as_str())
        .collect::<Vec<_>>()
        .join(",");
    url.query_pairs_mut()
        .clear()
        .append_pair("visualFeatures", &features);
    Ok(url)
}
