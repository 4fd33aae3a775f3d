//! Request signing for the health gateway
//!
//! Every gateway call carries an `X-IHU-Authorization-V2` header proving
//! possession of the shared secret:
//!
//! 1. `content-md5` = hex MD5 of the encoded body
//! 2. `auth_prefix` = `ihcloud/<access_key>/<timestamp>/300`
//! 3. `signing_key` = hex HMAC-SHA256(secret_key, auth_prefix)
//! 4. `canonical_request` = `POST\n<path>\ncontent-md5:<digest>`
//! 5. `signature` = hex HMAC-SHA256(signing_key, canonical_request)
//! 6. header value = `<auth_prefix>/<signature>`
//!
//! The timestamp uses the local clock with a literal `GMT` suffix, which is
//! what the gateway accepts.

pub mod canonical;

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

pub use canonical::to_canonical_string;

type HmacSha256 = Hmac<Sha256>;

/// Namespace identifying the API family in the auth prefix
pub const AUTH_NAMESPACE: &str = "ihcloud";

/// Header carrying the computed authorization value
pub const AUTH_HEADER: &str = "X-IHU-Authorization-V2";

/// Validity window of a signature in seconds
pub const SIGNATURE_TTL_SECONDS: u32 = 300;

/// `strftime` pattern for the signing timestamp (`16 Oct 2026 09:30:00 GMT`)
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

/// Environment variable holding the access key
pub const ACCESS_KEY_VAR: &str = "ak";

/// Environment variable holding the secret key
pub const SECRET_KEY_VAR: &str = "sk";

/// Signing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("Environment variable '{0}' is not set")]
    MissingCredential(&'static str),
}

/// Gateway access key and shared secret
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, SigningError> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.is_empty() {
            return Err(SigningError::MissingCredential(ACCESS_KEY_VAR));
        }
        if secret_key.is_empty() {
            return Err(SigningError::MissingCredential(SECRET_KEY_VAR));
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    /// Create credentials from optional configuration values
    pub fn from_options(
        access_key: Option<&str>,
        secret_key: Option<&str>,
    ) -> Result<Self, SigningError> {
        Self::new(access_key.unwrap_or_default(), secret_key.unwrap_or_default())
    }

    /// The access key identifier
    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// A body ready to send together with its authorization header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Encoded request body, exactly the bytes that were digested
    pub body: String,
    /// Hex MD5 of `body`
    pub content_md5: String,
    /// Signing timestamp
    pub timestamp: String,
    /// `<namespace>/<access_key>/<timestamp>/<ttl>`
    pub auth_prefix: String,
    /// Three-line string that was signed
    pub canonical_request: String,
    /// Final header value
    pub authorization: String,
}

/// Computes authorization headers for gateway requests
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    /// Create a signer for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Sign a request body for `path` using the current local time
    pub fn sign<T>(&self, path: &str, body: &T) -> serde_json::Result<SignedRequest>
    where
        T: ?Sized + Serialize,
    {
        self.sign_at(path, body, &current_timestamp())
    }

    /// Sign a request body for `path` with an explicit timestamp
    pub fn sign_at<T>(
        &self,
        path: &str,
        body: &T,
        timestamp: &str,
    ) -> serde_json::Result<SignedRequest>
    where
        T: ?Sized + Serialize,
    {
        let body = to_canonical_string(body)?;
        Ok(self.sign_encoded(path, body, timestamp))
    }

    /// Sign an already-encoded body
    pub fn sign_encoded(&self, path: &str, body: String, timestamp: &str) -> SignedRequest {
        let content_md5 = content_md5(&body);
        let auth_prefix = format!(
            "{}/{}/{}/{}",
            AUTH_NAMESPACE, self.credentials.access_key, timestamp, SIGNATURE_TTL_SECONDS
        );
        let signing_key = hmac_sha256_hex(self.credentials.secret_key.as_bytes(), &auth_prefix);
        let canonical_request = canonical_request(path, &content_md5);
        let signature = hmac_sha256_hex(signing_key.as_bytes(), &canonical_request);
        let authorization = format!("{}/{}", auth_prefix, signature);

        SignedRequest {
            body,
            content_md5,
            timestamp: timestamp.to_string(),
            auth_prefix,
            canonical_request,
            authorization,
        }
    }
}

/// Format a point in time as a signing timestamp
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Signing timestamp for the current local time
pub fn current_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Hex MD5 digest of a body
pub fn content_md5(body: &str) -> String {
    hex::encode(Md5::digest(body.as_bytes()))
}

/// The three-line string covered by the signature
pub fn canonical_request(path: &str, content_md5: &str) -> String {
    ["POST", path, &format!("content-md5:{}", content_md5)].join("\n")
}

fn hmac_sha256_hex(key: &[u8], message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
