//! Signed mint requests.
//!
//! The trusted signer signs the packed `(requester, quantity, nonce)` digest
//! with an EIP-191 prefix; [`MintRequest::verify_signer`] recovers and compares.

use alloy_primitives::{keccak256, Address, Bytes, Signature, SignatureError, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte width of a packed address.
const ADDRESS_LEN: usize = 20;

/// Byte width of a packed `uint256` quantity.
const QUANTITY_WORD_LEN: usize = 32;

/// A mint request as authorised by the off-chain signer.
///
/// The signer commits to the requesting wallet, the number of units and a
/// caller-chosen nonce. The nonce is opaque: any byte string is accepted and
/// a given nonce authorises at most one successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    /// Wallet that will receive the minted units.
    pub requester: Address,
    /// Number of units covered by the signature.
    pub quantity: u64,
    /// Replay-protection nonce bound into the digest.
    pub nonce: Bytes,
}

/// Reasons a request signature fails to check out.
#[derive(Debug, Error)]
pub enum SignatureCheckError {
    /// The signature bytes could not be parsed or recovered.
    #[error("malformed signature: {0}")]
    Malformed(#[from] SignatureError),
    /// The signature recovered to an address other than the trusted signer.
    #[error("signature recovered to {recovered}, expected {expected}")]
    WrongSigner {
        /// Address the signature actually recovers to.
        recovered: Address,
        /// Trusted signer the request was checked against.
        expected: Address,
    },
}

impl MintRequest {
    /// Creates a new request.
    pub fn new(requester: Address, quantity: u64, nonce: impl Into<Bytes>) -> Self {
        Self { requester, quantity, nonce: nonce.into() }
    }

    /// Digest the signer commits to.
    ///
    /// Packed layout: `requester (20) || quantity as uint256 (32) || nonce`.
    pub fn signing_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(ADDRESS_LEN + QUANTITY_WORD_LEN + self.nonce.len());
        buf.extend_from_slice(self.requester.as_slice());
        buf.extend_from_slice(&U256::from(self.quantity).to_be_bytes::<QUANTITY_WORD_LEN>());
        buf.extend_from_slice(&self.nonce);
        keccak256(&buf)
    }

    /// Recovers the signer address from a raw 65-byte signature.
    ///
    /// The digest is signed as an EIP-191 personal message, so recovery runs
    /// over the prefixed form of [`Self::signing_hash`].
    pub fn recover_signer(&self, signature: &[u8]) -> Result<Address, SignatureCheckError> {
        let signature = Signature::from_raw(signature)?;
        Ok(signature.recover_address_from_msg(self.signing_hash())?)
    }

    /// Checks that the signature was produced by `expected`.
    pub fn verify_signer(
        &self,
        signature: &[u8],
        expected: Address,
    ) -> Result<(), SignatureCheckError> {
        let recovered = self.recover_signer(signature)?;
        if recovered != expected {
            return Err(SignatureCheckError::WrongSigner { recovered, expected });
        }
        Ok(())
    }
}
