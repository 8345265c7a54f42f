//! In-process stand-ins for the blob service and the vision service.
//!
//! The vision fake decides what it "sees" from the image bytes:
//! `faces:Male,Female` yields two faces with those genders, `vision-error`
//! yields a 500, anything else yields no faces.

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{post, put};
use axum::{Json, Router};
use color_eyre::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const FAKE_ACCOUNT: &str = "devstoreaccount1";
pub const FACES_PREFIX: &str = "faces:";
pub const VISION_ERROR_IMAGE: &[u8] = b"vision-error";

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Bytes,
    pub query: String,
}

/// Everything the fakes received, shared with the tests.
#[derive(Default)]
pub struct FakeServices {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    analysis_calls: AtomicUsize,
    fail_uploads: AtomicBool,
    expected_subscription_key: String,
}

impl FakeServices {
    #[must_use]
    pub fn blob(&self, container: &str, name: &str) -> Option<StoredBlob> {
        self.blobs
            .lock()
            .ok()
            .and_then(|blobs| blobs.get(&format!("{container}/{name}")).cloned())
    }

    #[must_use]
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }
}

/// Starts both fakes on one free port and returns their shared state and base address.
pub async fn start_fake_services(
    subscription_key: &str,
) -> Result<(Arc<FakeServices>, SocketAddr, JoinHandle<()>)> {
    let services = Arc::new(FakeServices {
        expected_subscription_key: subscription_key.to_owned(),
        ..FakeServices::default()
    });

    let app = Router::new()
        .route(
            &format!("/{FAKE_ACCOUNT}/{{container}}/{{blob}}"),
            put(put_blob),
        )
        .route("/vision/v3.2/analyze", post(analyze))
        .with_state(services.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!("Fake services stopped: {e}");
        }
    });
    info!("Fake storage and vision services listening on {addr}");

    Ok((services, addr, handle))
}

async fn put_blob(
    State(services): State<Arc<FakeServices>>,
    Path((container, blob)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if services.fail_uploads.load(Ordering::SeqCst) {
        return StatusCode::FORBIDDEN;
    }
    let query = query.unwrap_or_default();
    if !query.contains("sp=cw") || !query.contains("sig=") {
        return StatusCode::FORBIDDEN;
    }
    if headers.get("x-ms-blob-type").and_then(|v| v.to_str().ok()) != Some("BlockBlob") {
        return StatusCode::BAD_REQUEST;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    if let Ok(mut blobs) = services.blobs.lock() {
        blobs.insert(
            format!("{container}/{blob}"),
            StoredBlob {
                content_type,
                bytes: body,
                query,
            },
        );
    }
    StatusCode::CREATED
}

async fn analyze(
    State(services): State<Arc<FakeServices>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    services.analysis_calls.fetch_add(1, Ordering::SeqCst);

    let key = headers
        .get("Ocp-Apim-Subscription-Key")
        .and_then(|v| v.to_str().ok());
    if key != Some(services.expected_subscription_key.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "code": "401", "message": "Access denied" } })),
        );
    }
    if body.as_ref() == VISION_ERROR_IMAGE {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": "InternalServerError", "message": "Something broke" })),
        );
    }

    let text = String::from_utf8_lossy(&body);
    let faces: Vec<Value> = text
        .strip_prefix(FACES_PREFIX)
        .map(|genders| {
            genders
                .split(',')
                .enumerate()
                .map(|(i, gender)| {
                    let left = 10 + 100 * i;
                    json!({
                        "age": 20 + i,
                        "gender": gender,
                        "faceRectangle": { "left": left, "top": 20, "width": 50, "height": 60 }
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "faces": faces,
            "tags": [{ "name": "person", "confidence": 0.9 }],
            "description": { "tags": [], "captions": [{ "text": "a test image", "confidence": 0.5 }] },
            "requestId": "fake-request",
            "metadata": { "width": 640, "height": 480, "format": "Jpeg" }
        })),
    )
}
