//! Process configuration, read once from the environment at startup.
//!
//! Every setting is immutable after load; the pipeline receives it by
//! reference instead of touching ambient globals, so tests can construct
//! `Settings` directly without mutating the process environment.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr as _;

use secrecy::SecretString;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::order::types::SignatureType;
use crate::types::{Address, ChainId};
use crate::{POLYGON, Result};

pub const DEFAULT_CLOB_HOST: &str = "https://clob.polymarket.com";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8010";

/// HTTP client policy: timeouts and the bounded retry schedule.
///
/// Tunables, not contracts; the defaults follow the exchange-client
/// conventions used elsewhere in the codebase.
#[derive(Clone, Debug)]
pub struct HttpPolicy {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// First backoff delay; doubles per retry.
    pub base_backoff_ms: u64,
}

impl Default for HttpPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
            max_retries: 3,
            base_backoff_ms: 500,
        }
    }
}

/// All process-wide configuration.
#[derive(Clone)]
pub struct Settings {
    pub clob_host: Url,
    pub chain_id: ChainId,
    pub private_key: Option<SecretString>,
    pub proxy_address: Option<Address>,
    pub signature_type: SignatureType,
    pub dry_run: bool,
    pub api_key: Option<String>,
    pub api_secret: Option<SecretString>,
    pub api_passphrase: Option<SecretString>,
    pub shared_secret: Option<SecretString>,
    pub bind_addr: SocketAddr,
    pub http: HttpPolicy,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from an arbitrary key lookup. Empty values count
    /// as unset, matching `.env`-file conventions.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            get(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let clob_host = get("CLOB_HOST").unwrap_or_else(|| DEFAULT_CLOB_HOST.to_owned());
        let clob_host = Url::parse(&clob_host)
            .map_err(|e| Error::config(format!("invalid CLOB_HOST `{clob_host}`: {e}")))?;

        let chain_id: ChainId = match get("CHAIN_ID") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::config(format!("invalid CHAIN_ID `{raw}`")))?,
            None => POLYGON,
        };
        if crate::contract_config(chain_id).is_none() {
            return Err(Error::config(format!(
                "unsupported CHAIN_ID {chain_id}; the CLOB settles on Polygon ({POLYGON})"
            )));
        }

        let private_key = match get("PRIVATE_KEY") {
            Some(raw) => {
                validate_private_key_shape(&raw)?;
                Some(SecretString::from(raw))
            }
            None => None,
        };

        let proxy_address = match get("POLYMARKET_PROXY") {
            Some(raw) => Some(
                Address::from_str(&raw)
                    .map_err(|_| Error::config("POLYMARKET_PROXY is not a valid 0x… address"))?,
            ),
            None => None,
        };

        let signature_type = match get("SIGNATURE_TYPE") {
            Some(raw) => raw.parse()?,
            // Browser-wallet proxy signing when a proxy is configured,
            // plain EOA otherwise.
            None if proxy_address.is_some() => SignatureType::GnosisSafe,
            None => SignatureType::Eoa,
        };
        if signature_type.requires_proxy() && proxy_address.is_none() {
            return Err(Error::config(format!(
                "SIGNATURE_TYPE {signature_type:?} requires POLYMARKET_PROXY to be set"
            )));
        }
        if !signature_type.requires_proxy() && proxy_address.is_some() {
            return Err(Error::config(
                "POLYMARKET_PROXY is set but SIGNATURE_TYPE is eoa; unset one of them",
            ));
        }

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| Error::config(format!("invalid BIND_ADDR `{bind_addr}`")))?;

        Ok(Self {
            clob_host,
            chain_id,
            private_key,
            proxy_address,
            signature_type,
            dry_run: parse_dry_run(get("DRY_RUN").as_deref()),
            api_key: get("API_KEY"),
            api_secret: get("API_SECRET").map(SecretString::from),
            api_passphrase: get("API_PASSPHRASE").map(SecretString::from),
            shared_secret: get("SHEETS_SECRET").map(SecretString::from),
            bind_addr,
            http: HttpPolicy::default(),
        })
    }

    /// L2 credentials from the environment, when all three parts are set.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_secret, &self.api_passphrase) {
            (Some(key), Some(secret), Some(passphrase)) => Some(Credentials::new(
                key.clone(),
                secret.clone(),
                passphrase.clone(),
            )),
            _ => None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("clob_host", &self.clob_host.as_str())
            .field("chain_id", &self.chain_id)
            .field("has_private_key", &self.private_key.is_some())
            .field("proxy_address", &self.proxy_address)
            .field("signature_type", &self.signature_type)
            .field("dry_run", &self.dry_run)
            .field("api_key", &self.api_key.as_deref().map(mask))
            .field("auth_required", &self.shared_secret.is_some())
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

/// Masks all but the last six characters, for introspection output.
#[must_use]
pub fn mask(value: &str) -> String {
    let keep = 6;
    let total = value.chars().count();
    let hidden = total.saturating_sub(keep);
    let mut masked: String = "*".repeat(hidden);
    masked.extend(value.chars().skip(hidden));
    masked
}

/// Only an explicit `0|false|no` switches submissions live. Unset or
/// unrecognized values stay in dry-run mode.
fn parse_dry_run(raw: Option<&str>) -> bool {
    match raw.map(str::to_ascii_lowercase) {
        None => true,
        Some(value) => match value.as_str() {
            "0" | "false" | "no" => false,
            "1" | "true" | "yes" => true,
            other => {
                tracing::warn!(value = other, "unrecognized DRY_RUN value; staying in dry-run mode");
                true
            }
        },
    }
}

fn validate_private_key_shape(raw: &str) -> Result<()> {
    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::config(
            "PRIVATE_KEY must be a 32-byte hex key (0x-prefixed, length 66)",
        ));
    }
    Ok(())
}
