//! Pre-sale whitelist: the published Merkle root and per-address used flags.

use alloy_primitives::{Address, B256};
use evo_common::verify_proof;
use std::collections::HashSet;
use thiserror::Error;

/// Whitelist failures on the pre-sale path.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WhitelistError {
    /// The proof does not lead to the published root, or no root is published.
    #[error("Invalid merkle proof")]
    InvalidProof {
        /// Address that presented the proof.
        address: Address,
    },
    /// The address already bought its pre-sale unit.
    #[error("Whitelist used")]
    AlreadyUsed {
        /// Address that already minted.
        address: Address,
    },
}

/// Published whitelist root plus the per-address used flags.
///
/// Replacing the root does not reset the flags.
#[derive(Debug, Clone, Default)]
pub struct WhitelistState {
    root: Option<B256>,
    used: HashSet<Address>,
}

impl WhitelistState {
    /// Creates a whitelist with an optional initial root.
    pub fn new(root: Option<B256>) -> Self {
        Self { root, used: HashSet::new() }
    }

    /// Published root, if any.
    pub const fn root(&self) -> Option<B256> {
        self.root
    }

    /// Publishes a new root, returning the previous one.
    pub fn set_root(&mut self, root: B256) -> Option<B256> {
        self.root.replace(root)
    }

    /// Returns true if `proof` places `address` under the published root.
    pub fn verify(&self, address: Address, proof: &[B256]) -> bool {
        verify_proof(self.root, address, proof)
    }

    /// Returns true if `address` already used its pre-sale slot.
    pub fn is_used(&self, address: Address) -> bool {
        self.used.contains(&address)
    }

    /// Read-only check of a pre-sale claim.
    pub fn check(&self, address: Address, proof: &[B256]) -> Result<(), WhitelistError> {
        if !self.verify(address, proof) {
            return Err(WhitelistError::InvalidProof { address });
        }
        if self.is_used(address) {
            return Err(WhitelistError::AlreadyUsed { address });
        }
        Ok(())
    }

    /// Flags `address` as used.
    pub fn mark_used(&mut self, address: Address) -> Result<(), WhitelistError> {
        if !self.used.insert(address) {
            return Err(WhitelistError::AlreadyUsed { address });
        }
        Ok(())
    }
}
