//! Service SAS tokens for single blobs, signed with the account's shared key.

use crate::storage::StorageError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SubsecRound, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Storage service version the string-to-sign layout below belongs to.
pub const SAS_VERSION: &str = "2022-11-02";
const SAS_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Permissions a blob SAS grants, rendered in the canonical `racwd` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobSasPermissions {
    pub read: bool,
    pub add: bool,
    pub create: bool,
    pub write: bool,
    pub delete: bool,
}

impl BlobSasPermissions {
    pub const READ: Self = Self {
        read: true,
        add: false,
        create: false,
        write: false,
        delete: false,
    };

    pub const CREATE_WRITE: Self = Self {
        read: false,
        add: false,
        create: true,
        write: true,
        delete: false,
    };
}

impl fmt::Display for BlobSasPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (granted, letter) in [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
        ] {
            if granted {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SasProtocol {
    Https,
    HttpsAndHttp,
}

impl SasProtocol {
    /// Picks the strictest protocol the given blob URL can be used with.
    #[must_use]
    pub fn for_url(url: &Url) -> Self {
        if url.scheme() == "https" {
            Self::Https
        } else {
            Self::HttpsAndHttp
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::HttpsAndHttp => "https,http",
        }
    }
}

/// Account name plus decoded account key.
#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    key: Vec<u8>,
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl SharedKeyCredential {
    /// # Errors
    ///
    /// * `StorageError::InvalidAccountKey` if the key is not base64.
    pub fn new(account_name: impl Into<String>, base64_key: &str) -> Result<Self, StorageError> {
        Ok(Self {
            account_name: account_name.into(),
            key: STANDARD.decode(base64_key.trim())?,
        })
    }

    #[must_use]
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Base64 HMAC-SHA256 of `string_to_sign` under the account key.
    pub fn sign(&self, string_to_sign: &str) -> Result<String, StorageError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| StorageError::Signing(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Describes a SAS for one blob before it is signed.
#[derive(Debug, Clone)]
pub struct BlobSasBuilder<'a> {
    pub container: &'a str,
    pub blob: &'a str,
    pub permissions: BlobSasPermissions,
    pub starts_on: Option<DateTime<Utc>>,
    pub expires_on: DateTime<Utc>,
    pub protocol: SasProtocol,
}

impl BlobSasBuilder<'_> {
    /// The newline separated string-to-sign for a blob service SAS.
    #[must_use]
    pub fn string_to_sign(&self, account_name: &str) -> String {
        let start = self.starts_on.map(format_sas_time).unwrap_or_default();
        let canonical_resource = format!("/blob/{account_name}/{}/{}", self.container, self.blob);
        [
            self.permissions.to_string(),
            start,
            format_sas_time(self.expires_on),
            canonical_resource,
            String::new(), // signed identifier
            String::new(), // signed ip
            self.protocol.as_str().to_owned(),
            SAS_VERSION.to_owned(),
            "b".to_owned(), // signed resource: blob
            String::new(), // snapshot time
            String::new(), // encryption scope
            String::new(), // rscc
            String::new(), // rscd
            String::new(), // rsce
            String::new(), // rscl
            String::new(), // rsct
        ]
        .join("\n")
    }

    /// Signs the SAS and returns its query parameters in the order the service emits them.
    pub fn sign(&self, credential: &SharedKeyCredential) -> Result<SasQuery, StorageError> {
        let signature = credential.sign(&self.string_to_sign(credential.account_name()))?;

        let mut pairs = vec![("sv", SAS_VERSION.to_owned())];
        if let Some(start) = self.starts_on {
            pairs.push(("st", format_sas_time(start)));
        }
        pairs.extend([
            ("se", format_sas_time(self.expires_on)),
            ("sr", "b".to_owned()),
            ("sp", self.permissions.to_string()),
            ("spr", self.protocol.as_str().to_owned()),
            ("sig", signature),
        ]);
        Ok(SasQuery { pairs })
    }
}

/// Signed SAS query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SasQuery {
    pairs: Vec<(&'static str, String)>,
}

impl SasQuery {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `url` with the SAS appended as its query string.
    #[must_use]
    pub fn apply(&self, url: &Url) -> Url {
        let mut signed = url.clone();
        signed
            .query_pairs_mut()
            .clear()
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
        signed
    }
}

/// A blob URL together with the SAS that makes it readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlobUrl {
    /// URL including the SAS query.
    pub url: Url,
    /// URL of the blob itself, without any SAS.
    pub blob_url: Url,
    pub permissions: BlobSasPermissions,
    pub expires_on: DateTime<Utc>,
}

/// SAS times have second precision, so generation times are cut to whole seconds first.
#[must_use]
pub fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}

fn format_sas_time(time: DateTime<Utc>) -> String {
    time.format(SAS_TIME_FORMAT).to_string()
}
