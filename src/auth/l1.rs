//! L1 (wallet) authentication headers.
//!
//! Signs an EIP-712 `ClobAuth` attestation with the account key. The
//! struct hash is assembled by hand because `address` is both the field
//! name and its Solidity type, which the `sol!` grammar rejects.

use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::primitives::{B256, keccak256};
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::types::{Address, ChainId, U256};
use crate::{Result, Timestamp};

pub const HEADER_ADDRESS: &str = "poly_address";
pub const HEADER_SIGNATURE: &str = "poly_signature";
pub const HEADER_TIMESTAMP: &str = "poly_timestamp";
pub const HEADER_NONCE: &str = "poly_nonce";

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("ClobAuthDomain"));
const DOMAIN_VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));

const CLOB_AUTH_TYPE: &[u8] =
    b"ClobAuth(address address,string timestamp,uint256 nonce,string message)";
const ATTESTATION: &str = "This message attests that I control the given wallet";

/// Headers for `auth/api-key` and `auth/derive-api-key`.
pub async fn create_headers(
    signer: &PrivateKeySigner,
    chain_id: ChainId,
    timestamp: Timestamp,
    nonce: Option<u32>,
) -> Result<HeaderMap> {
    let nonce = nonce.unwrap_or(0);
    let timestamp = timestamp.to_string();

    let digest = clob_auth_digest(signer.address(), &timestamp, nonce, chain_id);
    let signature = signer.sign_hash(&digest).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_ADDRESS),
        header_value(&signer.address().to_string())?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_SIGNATURE),
        header_value(&alloy::hex::encode_prefixed(signature.as_bytes()))?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_TIMESTAMP),
        header_value(&timestamp)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_NONCE),
        header_value(&nonce.to_string())?,
    );
    Ok(headers)
}

fn clob_auth_digest(address: Address, timestamp: &str, nonce: u32, chain_id: ChainId) -> B256 {
    let mut encoded = Vec::with_capacity(5 * 32);
    encoded.extend_from_slice(keccak256(CLOB_AUTH_TYPE).as_slice());
    encoded.extend_from_slice(address.into_word().as_slice());
    encoded.extend_from_slice(keccak256(timestamp.as_bytes()).as_slice());
    encoded.extend_from_slice(B256::from(U256::from(nonce)).as_slice());
    encoded.extend_from_slice(keccak256(ATTESTATION.as_bytes()).as_slice());
    let struct_hash = keccak256(&encoded);

    let domain = Eip712Domain {
        name: DOMAIN_NAME,
        version: DOMAIN_VERSION,
        chain_id: Some(U256::from(chain_id)),
        ..Eip712Domain::default()
    };

    let mut preimage = Vec::with_capacity(2 + 64);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain.separator().as_slice());
    preimage.extend_from_slice(struct_hash.as_slice());
    keccak256(&preimage)
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::validation(format!("value is not a valid header: {value}")))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;
    use crate::POLYGON;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_signer() -> PrivateKeySigner {
        PrivateKeySigner::from_str(TEST_KEY).expect("test key must parse")
    }

    #[tokio::test]
    async fn headers_carry_address_and_signature() {
        let signer = test_signer();
        let headers = create_headers(&signer, POLYGON, 1_700_000_000, None)
            .await
            .expect("headers must build");

        assert_eq!(
            headers
                .get(HEADER_ADDRESS)
                .and_then(|v| v.to_str().ok())
                .expect("address header"),
            signer.address().to_string()
        );
        let signature = headers
            .get(HEADER_SIGNATURE)
            .and_then(|v| v.to_str().ok())
            .expect("signature header");
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 65 * 2);
        assert_eq!(
            headers.get(HEADER_NONCE).and_then(|v| v.to_str().ok()),
            Some("0")
        );
    }

    #[tokio::test]
    async fn signature_recovers_to_the_signer() {
        let signer = test_signer();
        let timestamp = "1700000000";
        let digest = clob_auth_digest(signer.address(), timestamp, 0, POLYGON);
        let signature = signer.sign_hash(&digest).await.expect("signing must work");
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .expect("recovery must work");
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn digest_is_domain_separated() {
        let address = test_signer().address();
        let mainnet = clob_auth_digest(address, "1700000000", 0, POLYGON);
        let other = clob_auth_digest(address, "1700000000", 0, 80_002);
        assert_ne!(mainnet, other);
    }
}
