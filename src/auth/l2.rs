//! L2 (API key) authentication headers.
//!
//! HMAC-SHA256 over `timestamp + method + path + body`, keyed with the
//! url-safe-base64-decoded API secret. Every authenticated CLOB request
//! carries these five headers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use hmac::{Hmac, Mac as _};
use reqwest::header::{HeaderMap, HeaderName};
use sha2::Sha256;

use crate::auth::Credentials;
use crate::auth::l1::{HEADER_ADDRESS, HEADER_SIGNATURE, HEADER_TIMESTAMP, header_value};
use crate::error::Error;
use crate::types::Address;
use crate::{Result, Timestamp};

pub const HEADER_API_KEY: &str = "poly_api_key";
pub const HEADER_PASSPHRASE: &str = "poly_passphrase";

type HmacSha256 = Hmac<Sha256>;

/// Headers for an already-built request; the signature covers the exact
/// method, path, and body bytes that will go on the wire.
pub fn create_headers(
    address: Address,
    credentials: &Credentials,
    request: &reqwest::Request,
    timestamp: Timestamp,
) -> Result<HeaderMap> {
    let timestamp = timestamp.to_string();
    let body = match request.body().and_then(reqwest::Body::as_bytes) {
        Some(bytes) => Some(
            std::str::from_utf8(bytes)
                .map_err(|_| Error::signing("request body is not valid utf-8"))?,
        ),
        None => None,
    };

    let signature = build_hmac_signature(
        credentials.secret(),
        &timestamp,
        request.method().as_str(),
        request.url().path(),
        body,
    )?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_ADDRESS),
        header_value(&address.to_string())?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_SIGNATURE),
        header_value(&signature)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_TIMESTAMP),
        header_value(&timestamp)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_API_KEY),
        header_value(credentials.key())?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_PASSPHRASE),
        header_value(credentials.passphrase())?,
    );
    Ok(headers)
}

pub(crate) fn build_hmac_signature(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<String> {
    let key = URL_SAFE
        .decode(secret)
        .map_err(|_| Error::signing("API secret is not valid url-safe base64"))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|_| Error::signing("API secret rejected by HMAC"))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    if let Some(body) = body {
        mac.update(body.as_bytes());
    }
    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}
