//! Single-owner access control.

use alloy_primitives::Address;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by [`OwnershipGuard`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OwnershipError {
    /// The caller is not the current owner.
    #[error("Ownable: caller is not the owner")]
    NotOwner {
        /// Address that attempted the privileged call.
        caller: Address,
    },
    /// Ownership cannot be handed to the zero address.
    #[error("Ownable: new owner is the zero address")]
    ZeroOwner,
}

/// Record of an ownership hand-over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransfer {
    /// Owner before the change.
    pub previous_owner: Address,
    /// Owner after the change.
    pub new_owner: Address,
}

/// Tracks the single privileged account of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipGuard {
    owner: Address,
}

impl OwnershipGuard {
    /// Creates a guard owned by `owner`.
    pub const fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Returns the current owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Fails unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), OwnershipError> {
        if caller != self.owner {
            return Err(OwnershipError::NotOwner { caller });
        }
        Ok(())
    }

    /// Hands ownership to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<OwnershipTransfer, OwnershipError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OwnershipError::ZeroOwner);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(%previous_owner, %new_owner, "ownership transferred");
        Ok(OwnershipTransfer { previous_owner, new_owner })
    }
}
