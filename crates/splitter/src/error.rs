use crate::{config::ConfigError, types::AssetKind};
use alloy_primitives::{Address, U256};
use evo_common::OwnershipError;
use thiserror::Error;

/// Errors raised while holding or distributing funds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterError {
    /// Nothing to withdraw.
    #[error("Balance is zero")]
    BalanceZero {
        /// Asset that was requested.
        asset: AssetKind,
    },
    /// A privileged call came from someone other than the owner.
    #[error(transparent)]
    Ownership(#[from] OwnershipError),
    /// The beneficiary table is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No beneficiary at this position.
    #[error("no beneficiary at index {index} (table has {len})")]
    UnknownBeneficiary {
        /// Requested position.
        index: usize,
        /// Table length.
        len: usize,
    },
    /// Payouts cannot go to the zero address.
    #[error("beneficiary cannot be the zero address")]
    ZeroBeneficiary,
    /// A deposit would push the balance past 2^256 - 1.
    #[error("balance overflow for {asset}")]
    BalanceOverflow {
        /// Asset being deposited.
        asset: AssetKind,
    },
    /// A debit exceeds what the vault holds.
    #[error("insufficient {asset} balance: have {available}, need {requested}")]
    InsufficientBalance {
        /// Asset being debited.
        asset: AssetKind,
        /// Current balance.
        available: U256,
        /// Amount requested.
        requested: U256,
    },
}

impl SplitterError {
    /// Address that triggered a permission failure, if any.
    pub const fn rejected_caller(&self) -> Option<Address> {
        match self {
            Self::Ownership(OwnershipError::NotOwner { caller }) => Some(*caller),
            _ => None,
        }
    }
}
