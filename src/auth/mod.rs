//! Exchange authentication: credentials plus L1/L2 header signing.
//!
//! L1 is a wallet-level EIP-712 attestation used to create or derive L2
//! credentials; L2 is HMAC-SHA256 request signing with those credentials
//! and is what every authenticated CLOB call carries.

pub mod l1;
pub mod l2;

use std::fmt;

use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::config::mask;

/// L2 API credentials: key id plus secret and passphrase.
///
/// Deserializes from the `auth/api-key` response shape. The secret and
/// passphrase are never logged or serialized back out.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    api_key: String,
    secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(api_key: String, secret: SecretString, passphrase: SecretString) -> Self {
        Self {
            api_key,
            secret,
            passphrase,
        }
    }

    /// API key id; doubles as the `owner` field of order payloads.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub(crate) fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}
