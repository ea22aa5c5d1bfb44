//! Signed-request authorization and replay protection.
//!
//! Every check here is read-only. The engine runs all checks for a request
//! first and only then calls the `consume_*` methods, so a rejected request
//! leaves no trace.

use alloy_primitives::{Address, Bytes};
use evo_common::{MintRequest, SignatureCheckError};
use evo_ledger::SourceCollection;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Which early-access allowance a source unit is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageCategory {
    /// Free unit.
    FreeMint,
    /// Discounted unit.
    PreSale,
}

/// Authorization failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The signature is malformed or was not produced by the trusted signer.
    #[error("Signature does not correspond")]
    SignatureMismatch {
        /// Address the signature recovered to, when it could be recovered.
        recovered: Option<Address>,
    },
    /// The nonce was consumed by an earlier mint.
    #[error("Nonce already used")]
    NonceReused {
        /// Offending nonce.
        nonce: Bytes,
    },
    /// The requester does not hold the source unit.
    #[error("Token not owned")]
    TokenNotOwned {
        /// Source unit id.
        token_id: u64,
    },
    /// The source unit's allowance for this category is spent.
    #[error("Token already used")]
    TokenAlreadyUsed {
        /// Source unit id.
        token_id: u64,
        /// Allowance that was requested.
        category: UsageCategory,
    },
}

impl From<SignatureCheckError> for AuthError {
    fn from(err: SignatureCheckError) -> Self {
        let recovered = match err {
            SignatureCheckError::WrongSigner { recovered, .. } => Some(recovered),
            SignatureCheckError::Malformed(_) => None,
        };
        Self::SignatureMismatch { recovered }
    }
}

/// Append-only set of consumed nonces.
#[derive(Debug, Clone, Default)]
pub struct UsedNonceSet {
    nonces: HashSet<Bytes>,
}

impl UsedNonceSet {
    /// Returns true if `nonce` was consumed.
    pub fn contains(&self, nonce: &Bytes) -> bool {
        self.nonces.contains(nonce)
    }

    /// Number of consumed nonces.
    pub fn len(&self) -> usize {
        self.nonces.len()
    }

    /// Returns true if nothing was consumed yet.
    pub fn is_empty(&self) -> bool {
        self.nonces.is_empty()
    }

    /// Records `nonce`; fails if it was already there. Membership test and
    /// insertion are one operation.
    pub fn consume(&mut self, nonce: Bytes) -> Result<(), AuthError> {
        if !self.nonces.insert(nonce.clone()) {
            return Err(AuthError::NonceReused { nonce });
        }
        Ok(())
    }
}

/// Allowance flags of one source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnitFlags {
    /// The free allowance was claimed.
    pub free_mint_used: bool,
    /// The discounted allowance was claimed.
    pub pre_sale_used: bool,
}

impl SourceUnitFlags {
    const fn get(self, category: UsageCategory) -> bool {
        match category {
            UsageCategory::FreeMint => self.free_mint_used,
            UsageCategory::PreSale => self.pre_sale_used,
        }
    }

    fn set(&mut self, category: UsageCategory) {
        match category {
            UsageCategory::FreeMint => self.free_mint_used = true,
            UsageCategory::PreSale => self.pre_sale_used = true,
        }
    }
}

/// Per-unit allowance flags for the source collection.
#[derive(Debug, Clone, Default)]
pub struct SourceUnitUsage {
    flags: HashMap<u64, SourceUnitFlags>,
}

impl SourceUnitUsage {
    /// Flags of `token_id`; untouched units report both allowances unused.
    pub fn flags(&self, token_id: u64) -> SourceUnitFlags {
        self.flags.get(&token_id).copied().unwrap_or_default()
    }

    /// Returns true if the allowance of `token_id` for `category` is spent.
    pub fn is_used(&self, token_id: u64, category: UsageCategory) -> bool {
        self.flags(token_id).get(category)
    }

    /// Spends the allowance; fails if it was already spent.
    pub fn mark(&mut self, token_id: u64, category: UsageCategory) -> Result<(), AuthError> {
        let entry = self.flags.entry(token_id).or_default();
        if entry.get(category) {
            return Err(AuthError::TokenAlreadyUsed { token_id, category });
        }
        entry.set(category);
        Ok(())
    }
}

/// Trusted-signer check, nonce registry and source-unit allowances.
#[derive(Debug, Clone)]
pub struct MintAuthorizer {
    signer: Address,
    nonces: UsedNonceSet,
    usage: SourceUnitUsage,
}

impl MintAuthorizer {
    /// Creates an authorizer trusting `signer`.
    pub fn new(signer: Address) -> Self {
        Self { signer, nonces: UsedNonceSet::default(), usage: SourceUnitUsage::default() }
    }

    /// Currently trusted signer.
    pub const fn signer(&self) -> Address {
        self.signer
    }

    /// Replaces the trusted signer. Outstanding signatures from the old key stop verifying.
    pub fn set_signer(&mut self, signer: Address) -> Address {
        std::mem::replace(&mut self.signer, signer)
    }

    /// Consumed nonces.
    pub const fn nonces(&self) -> &UsedNonceSet {
        &self.nonces
    }

    /// Source-unit allowance flags.
    pub const fn usage(&self) -> &SourceUnitUsage {
        &self.usage
    }

    /// Checks the signature and that the nonce is fresh.
    pub fn check(&self, request: &MintRequest, signature: &[u8]) -> Result<(), AuthError> {
        request.verify_signer(signature, self.signer)?;
        if self.nonces.contains(&request.nonce) {
            return Err(AuthError::NonceReused { nonce: request.nonce.clone() });
        }
        Ok(())
    }

    /// [`Self::check`] followed by nonce consumption.
    pub fn verify_and_consume(
        &mut self,
        request: &MintRequest,
        signature: &[u8],
    ) -> Result<(), AuthError> {
        request.verify_signer(signature, self.signer)?;
        self.nonces.consume(request.nonce.clone())
    }

    /// Consumes a nonce that already passed [`Self::check`].
    pub fn consume_nonce(&mut self, nonce: &Bytes) -> Result<(), AuthError> {
        self.nonces.consume(nonce.clone())
    }

    /// Checks that `requester` holds every listed source unit and that each
    /// allowance is unspent. An id listed twice in one category counts as spent.
    pub fn check_source_units<S: SourceCollection + ?Sized>(
        &self,
        source: &S,
        requester: Address,
        free_ids: &[u64],
        pre_sale_ids: &[u64],
    ) -> Result<(), AuthError> {
        for (ids, category) in
            [(free_ids, UsageCategory::FreeMint), (pre_sale_ids, UsageCategory::PreSale)]
        {
            let mut seen = HashSet::with_capacity(ids.len());
            for &token_id in ids {
                if !source.is_held_by(token_id, requester) {
                    return Err(AuthError::TokenNotOwned { token_id });
                }
                if !seen.insert(token_id) || self.usage.is_used(token_id, category) {
                    return Err(AuthError::TokenAlreadyUsed { token_id, category });
                }
            }
        }
        Ok(())
    }

    /// Spends the allowances of units that already passed
    /// [`Self::check_source_units`].
    pub fn consume_source_units(
        &mut self,
        free_ids: &[u64],
        pre_sale_ids: &[u64],
    ) -> Result<(), AuthError> {
        for &token_id in free_ids {
            self.usage.mark(token_id, UsageCategory::FreeMint)?;
        }
        for &token_id in pre_sale_ids {
            self.usage.mark(token_id, UsageCategory::PreSale)?;
        }
        Ok(())
    }
}
