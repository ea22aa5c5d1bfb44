use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Category of a ledger failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerErrorKind {
    /// A capacity ceiling would be crossed.
    Capacity,
    /// The attached value does not cover the order.
    Payment,
    /// The caller may not act on the unit.
    Permission,
    /// The unit does not exist.
    Lookup,
    /// The request itself is malformed.
    Invalid,
}

/// Errors raised by [`crate::UnitLedger`] and [`crate::SupplyLedger`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A mint asked for zero units.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,
    /// More units than the per-transaction ceiling.
    #[error("Cannot mint more than MAX_BATCH_MINT per transaction")]
    BatchTooLarge {
        /// Units requested.
        quantity: u64,
        /// Per-transaction ceiling.
        max: u64,
    },
    /// The wallet would end up holding more than the ceiling.
    #[error("Any one wallet cannot hold more than MAX_BATCH_MINT")]
    WalletCapExceeded {
        /// Wallet receiving the units.
        wallet: Address,
        /// Units the wallet already holds.
        held: u64,
        /// Units requested.
        quantity: u64,
    },
    /// The collection would exceed its max supply.
    #[error("Not enough supply")]
    SupplyExhausted {
        /// Units requested.
        quantity: u64,
        /// Units still available.
        remaining: u64,
    },
    /// The reserved pool cannot cover the request.
    #[error("Not enough reserved supply")]
    ReservedExhausted {
        /// Units requested.
        quantity: u64,
        /// Units left in the reserved pool.
        remaining: u64,
    },
    /// The attached value is below the order total.
    #[error("Insufficient eth to process the order")]
    InsufficientPayment {
        /// Order total.
        required: U256,
        /// Value attached to the call.
        provided: U256,
    },
    /// The order total does not fit in 256 bits.
    #[error("order total overflows")]
    PaymentOverflow,
    /// The caller neither owns the unit nor is approved for it.
    #[error("caller is not owner nor approved")]
    NotOwnerOrApproved {
        /// Address that attempted the call.
        caller: Address,
        /// Unit the call targeted.
        token_id: u64,
    },
    /// Approving the current owner is meaningless.
    #[error("approval to current owner")]
    ApprovalToCurrentOwner,
    /// An owner cannot register itself as its own operator.
    #[error("approve to caller")]
    ApproveToCaller,
    /// The unit was never minted or has been burned.
    #[error("owner query for nonexistent token")]
    NonexistentToken {
        /// Unit that was queried.
        token_id: u64,
    },
    /// `from` does not own the unit being transferred.
    #[error("transfer from incorrect owner")]
    TransferFromIncorrectOwner {
        /// Claimed owner.
        from: Address,
        /// Unit being transferred.
        token_id: u64,
    },
    /// Units cannot be sent to the zero address.
    #[error("transfer to the zero address")]
    TransferToZeroAddress,
    /// Units cannot be minted to the zero address.
    #[error("mint to the zero address")]
    MintToZeroAddress,
}

impl LedgerError {
    /// Returns the failure category.
    pub const fn kind(&self) -> LedgerErrorKind {
        match self {
            Self::BatchTooLarge { .. }
            | Self::WalletCapExceeded { .. }
            | Self::SupplyExhausted { .. }
            | Self::ReservedExhausted { .. }
            | Self::ZeroQuantity => LedgerErrorKind::Capacity,
            Self::InsufficientPayment { .. } | Self::PaymentOverflow => LedgerErrorKind::Payment,
            Self::NotOwnerOrApproved { .. } | Self::TransferFromIncorrectOwner { .. } => {
                LedgerErrorKind::Permission
            }
            Self::NonexistentToken { .. } => LedgerErrorKind::Lookup,
            Self::ApprovalToCurrentOwner
            | Self::ApproveToCaller
            | Self::TransferToZeroAddress
            | Self::MintToZeroAddress => LedgerErrorKind::Invalid,
        }
    }
}
