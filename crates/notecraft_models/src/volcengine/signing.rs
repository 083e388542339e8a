//! HMAC-SHA256 request signing for the Volcengine OpenAPI gateway.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use notecraft_error::{ProviderError, ProviderErrorKind};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HMAC-SHA256";
const REGION: &str = "cn-north-1";
const SERVICE: &str = "cv";
const SIGNED_HEADERS: &str = "content-type;host;x-content-sha256;x-date";

/// Access and secret key pair.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"********")
            .finish()
    }
}

/// Header values to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `X-Date`
    pub x_date: String,
    /// `X-Content-Sha256`
    pub content_sha256: String,
    /// `Authorization`
    pub authorization: String,
}

impl Credentials {
    /// Creates a key pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Signs a JSON `POST /` request.
    ///
    /// `query` is a list of `(key, value)` pairs whose values need no
    /// percent-encoding; they are sorted by key for the canonical form.
    pub fn sign(
        &self,
        host: &str,
        query: &[(&str, &str)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, ProviderError> {
        let x_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let short_date = &x_date[..8];
        let content_sha256 = hex::encode(Sha256::digest(body));

        let canonical_headers = format!(
            "content-type:application/json\nhost:{}\nx-content-sha256:{}\nx-date:{}\n",
            host, content_sha256, x_date
        );
        let canonical_request = format!(
            "POST\n/\n{}\n{}\n{}\n{}",
            canonical_query(query),
            canonical_headers,
            SIGNED_HEADERS,
            content_sha256
        );

        let scope = format!("{}/{}/{}/request", short_date, REGION, SERVICE);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            x_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let k_date = hmac(self.secret_key.as_bytes(), short_date.as_bytes())?;
        let k_region = hmac(&k_date, REGION.as_bytes())?;
        let k_service = hmac(&k_region, SERVICE.as_bytes())?;
        let k_signing = hmac(&k_service, b"request")?;
        let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes())?);

        Ok(SignedHeaders {
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, scope, SIGNED_HEADERS, signature
            ),
            x_date,
            content_sha256,
        })
    }
}

/// `key=value` pairs sorted by key and joined with `&`.
pub fn canonical_query(query: &[(&str, &str)]) -> String {
    let mut pairs = query.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| {
        ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
            "Invalid signing key: {}",
            e
        )))
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
