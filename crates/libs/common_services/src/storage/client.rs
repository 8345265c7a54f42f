use crate::storage::sas::{
    BlobSasBuilder, BlobSasPermissions, SAS_VERSION, SasProtocol, SharedKeyCredential,
    SignedBlobUrl, truncate_to_seconds,
};
use crate::storage::{BlobStore, READ_URL_VALIDITY, StorageError};
use app_state::StorageSettings;
use axum::body::Bytes;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

/// Blob container client that authenticates every request with a service SAS.
#[derive(Clone, Debug)]
pub struct AzureBlobStore {
    http_client: Client,
    credential: SharedKeyCredential,
    container: String,
    account_url: Url,
    upload_sas_validity: Duration,
}

impl AzureBlobStore {
    /// # Errors
    ///
    /// * `StorageError::InvalidAccountKey` if the configured key is not base64.
    pub fn new(http_client: Client, settings: &StorageSettings) -> Result<Self, StorageError> {
        Ok(Self {
            http_client,
            credential: SharedKeyCredential::new(&settings.account_name, &settings.account_key)?,
            container: settings.container_name.clone(),
            account_url: settings.account_url.clone(),
            upload_sas_validity: Duration::minutes(settings.upload_sas_minutes),
        })
    }

    /// URL of a blob in the configured container, without a SAS.
    pub fn blob_url(&self, blob_name: &str) -> Result<Url, StorageError> {
        let mut url = self.account_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidUrl(self.account_url.to_string()))?
            .pop_if_empty()
            .push(&self.container)
            .push(blob_name);
        Ok(url)
    }

    /// Signs `blob_name` with `permissions`, valid from now until `expires_on`.
    pub fn signed_url(
        &self,
        blob_name: &str,
        permissions: BlobSasPermissions,
        expires_on: DateTime<Utc>,
    ) -> Result<SignedBlobUrl, StorageError> {
        let blob_url = self.blob_url(blob_name)?;
        let query = BlobSasBuilder {
            container: &self.container,
            blob: blob_name,
            permissions,
            starts_on: None,
            expires_on,
            protocol: SasProtocol::for_url(&blob_url),
        }
        .sign(&self.credential)?;

        Ok(SignedBlobUrl {
            url: query.apply(&blob_url),
            blob_url,
            permissions,
            expires_on,
        })
    }
}

impl BlobStore for AzureBlobStore {
    async fn upload(
        &self,
        blob_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        let expires_on = truncate_to_seconds(Utc::now()) + self.upload_sas_validity;
        let signed = self.signed_url(blob_name, BlobSasPermissions::CREATE_WRITE, expires_on)?;
        let size = bytes.len();
        debug!("Uploading {size} bytes to {}", signed.blob_url);

        let response = self
            .http_client
            .put(signed.url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-version", SAS_VERSION)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Service { status, message });
        }

        info!("Stored blob {blob_name} ({size} bytes) in {}", self.container);
        Ok(())
    }

    fn read_url(&self, blob_name: &str, now: DateTime<Utc>) -> Result<SignedBlobUrl, StorageError> {
        let expires_on = truncate_to_seconds(now) + READ_URL_VALIDITY;
        self.signed_url(blob_name, BlobSasPermissions::READ, expires_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::put;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    struct ReceivedPut {
        blob: String,
        query: String,
        blob_type: Option<String>,
        content_type: Option<String>,
        body: Bytes,
    }

    type Received = Arc<Mutex<Vec<ReceivedPut>>>;

    async fn record_put(
        State(received): State<Received>,
        Path(blob): Path<String>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        received.lock().expect("lock").push(ReceivedPut {
            blob,
            query: query.unwrap_or_default(),
            blob_type: header("x-ms-blob-type"),
            content_type: header("content-type"),
            body,
        });
        StatusCode::CREATED
    }

    async fn spawn_stub(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });
        format!("http://{addr}/devstoreaccount1")
    }

    fn settings(account_url: &str) -> StorageSettings {
        StorageSettings {
            account_name: "photostore".to_owned(),
            account_key: "c2VjcmV0LWFjY291bnQta2V5LWZvci10ZXN0cw==".to_owned(),
            container_name: "uploads".to_owned(),
            account_url: Url::parse(account_url).expect("valid url"),
            upload_sas_minutes: 5,
        }
    }

    fn store(account_url: &str) -> AzureBlobStore {
        AzureBlobStore::new(Client::new(), &settings(account_url)).expect("valid settings")
    }

    #[test]
    fn blob_url_appends_container_and_name() -> Result<(), StorageError> {
        let cloud = store("https://photostore.blob.core.windows.net");
        assert_eq!(
            cloud.blob_url("a.jpg")?.as_str(),
            "https://photostore.blob.core.windows.net/uploads/a.jpg"
        );

        let emulator = store("http://127.0.0.1:10000/devstoreaccount1");
        assert_eq!(
            emulator.blob_url("a.jpg")?.as_str(),
            "http://127.0.0.1:10000/devstoreaccount1/uploads/a.jpg"
        );
        Ok(())
    }

    #[test]
    fn read_url_expires_thirty_minutes_after_generation() -> Result<(), StorageError> {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid date")
            + Duration::milliseconds(450);
        let signed = store("https://photostore.blob.core.windows.net").read_url("a.jpg", now)?;

        assert_eq!(signed.expires_on - truncate_to_seconds(now), Duration::minutes(30));
        assert_eq!(signed.permissions, BlobSasPermissions::READ);

        let query: Vec<(String, String)> = signed
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let value = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(value("sp").as_deref(), Some("r"));
        assert_eq!(value("se").as_deref(), Some("2024-05-01T12:30:00Z"));
        assert_eq!(value("spr").as_deref(), Some("https"));
        assert_eq!(signed.blob_url.query(), None);
        Ok(())
    }

    #[test]
    fn plain_http_endpoints_allow_http() -> Result<(), StorageError> {
        let signed = store("http://127.0.0.1:10000/devstoreaccount1").read_url("a.jpg", Utc::now())?;
        assert!(signed.url.as_str().contains("spr=https%2Chttp"));
        Ok(())
    }

    #[tokio::test]
    async fn upload_puts_a_block_blob_with_a_write_sas() -> Result<(), StorageError> {
        let received = Received::default();
        let account_url = spawn_stub(
            Router::new()
                .route("/devstoreaccount1/uploads/{blob}", put(record_put))
                .with_state(received.clone()),
        )
        .await;

        store(&account_url)
            .upload("3f0c.png", "image/png", Bytes::from_static(b"png bytes"))
            .await?;

        let puts = received.lock().expect("lock").clone();
        assert_eq!(puts.len(), 1);
        let request = &puts[0];
        assert_eq!(request.blob, "3f0c.png");
        assert!(request.query.contains("sp=cw"));
        assert!(request.query.contains("sig="));
        assert_eq!(request.blob_type.as_deref(), Some("BlockBlob"));
        assert_eq!(request.content_type.as_deref(), Some("image/png"));
        assert_eq!(request.body.as_ref(), b"png bytes");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_upload_is_a_service_error() {
        let account_url = spawn_stub(Router::new().route(
            "/devstoreaccount1/uploads/{blob}",
            put(|| async { (StatusCode::FORBIDDEN, "AuthenticationFailed") }),
        ))
        .await;

        let result = store(&account_url)
            .upload("3f0c.jpg", "image/jpeg", Bytes::from_static(b"jpeg bytes"))
            .await;

        match result {
            Err(StorageError::Service { status, message }) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "AuthenticationFailed");
            }
            other => panic!("expected a service error, got {other:?}"),
        }
    }
}
