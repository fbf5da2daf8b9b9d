//! EIP-712 order signing.

use std::borrow::Cow;
use std::str::FromStr as _;

use alloy::dyn_abi::Eip712Domain;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolStruct as _;
use secrecy::{ExposeSecret as _, SecretString};

use crate::error::Error;
use crate::order::types::{CanonicalOrder, SignedOrder};
use crate::types::{Address, ChainId, U256};
use crate::{Result, contract_config};

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("Polymarket CTF Exchange"));
const DOMAIN_VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));

/// Signs canonical orders with the account key.
///
/// The domain binds `chain_id` and the verifying exchange contract, so a
/// signature can neither replay across chains nor across exchanges.
#[derive(Clone, Debug)]
pub struct OrderSigner {
    signer: PrivateKeySigner,
    chain_id: ChainId,
}

impl OrderSigner {
    /// Fails closed: a missing or malformed key is an error, never an
    /// unsigned order.
    pub fn from_key(private_key: &SecretString, chain_id: ChainId) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key.expose_secret().trim())
            .map_err(|e| Error::signing(format!("invalid private key: {e}")))?
            .with_chain_id(Some(chain_id));
        Ok(Self { signer, chain_id })
    }

    /// Wallet address derived from the private key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub(crate) fn wallet(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// EIP-712 domain for the given contract flavor.
    pub fn domain(&self, neg_risk: bool) -> Result<Eip712Domain> {
        let contracts = contract_config(self.chain_id).ok_or_else(|| {
            Error::signing(format!(
                "no exchange contracts known for chain {}",
                self.chain_id
            ))
        })?;
        Ok(Eip712Domain {
            name: DOMAIN_NAME,
            version: DOMAIN_VERSION,
            chain_id: Some(U256::from(self.chain_id)),
            verifying_contract: Some(contracts.verifying_contract(neg_risk)),
            ..Eip712Domain::default()
        })
    }

    /// Signs the exact struct the wire payload will carry. The digest is
    /// computed and signed back to back; nothing mutates the order in
    /// between.
    pub async fn sign(&self, canonical: &CanonicalOrder) -> Result<SignedOrder> {
        let domain = self.domain(canonical.neg_risk)?;
        let digest = canonical.order.eip712_signing_hash(&domain);
        let signature = self.signer.sign_hash(&digest).await?;
        Ok(SignedOrder {
            order: canonical.order.clone(),
            signature,
            order_type: canonical.order_type,
        })
    }
}
