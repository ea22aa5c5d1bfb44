//! Records emitted by the engine.
//!
//! [`MintEvent`] is the engine-side record. Each one renders to the EVM log
//! the collection contract would have emitted via [`MintEvent::to_log`].

use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::{sol, SolEvent};
use evo_common::OwnershipTransfer;
use evo_ledger::TransferRecord;
use serde::Serialize;

sol! {
    /// Event surface of the collection contract.
    contract EvolutionCollection {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId);
        event ApprovalForAll(address indexed owner, address indexed operator, bool approved);
        event FreeMintBegins();
        event PreSaleBegins();
        event SaleBegins();
        event SaleEnds();
        event Paused(address account);
        event Unpaused(address account);
        event SetBaseURI(string baseURI);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}

/// Observable side effect of a successful entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum MintEvent {
    /// A unit changed hands. Mints come from zero, burns go to zero.
    Transfer {
        /// Previous holder.
        from: Address,
        /// New holder.
        to: Address,
        /// Unit id.
        token_id: u64,
    },
    /// A single-unit approval was set or cleared.
    Approval {
        /// Unit holder.
        owner: Address,
        /// Approved account, zero when cleared.
        approved: Address,
        /// Unit id.
        token_id: u64,
    },
    /// An operator was granted or revoked.
    ApprovalForAll {
        /// Unit holder.
        owner: Address,
        /// Operator account.
        operator: Address,
        /// New status.
        approved: bool,
    },
    /// Free-mint window opened.
    FreeMintBegins,
    /// Pre-sale window opened.
    PreSaleBegins,
    /// Public sale opened.
    SaleBegins,
    /// Sale closed for good.
    SaleEnds,
    /// Current window paused.
    Paused {
        /// Account that paused.
        account: Address,
    },
    /// Current window resumed.
    Unpaused {
        /// Account that resumed.
        account: Address,
    },
    /// Metadata base location changed.
    #[serde(rename = "SetBaseURI")]
    SetBaseUri {
        /// New base, always ending in `/`.
        base_uri: String,
    },
    /// Contract ownership moved.
    OwnershipTransferred {
        /// Owner before.
        previous_owner: Address,
        /// Owner after.
        new_owner: Address,
    },
}

impl MintEvent {
    /// Event name as it appears in the contract ABI.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::ApprovalForAll { .. } => "ApprovalForAll",
            Self::FreeMintBegins => "FreeMintBegins",
            Self::PreSaleBegins => "PreSaleBegins",
            Self::SaleBegins => "SaleBegins",
            Self::SaleEnds => "SaleEnds",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
            Self::SetBaseUri { .. } => "SetBaseURI",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// Renders the record as an EVM log emitted by `emitter`.
    pub fn to_log(&self, emitter: Address) -> Log {
        use EvolutionCollection as abi;

        let data = match self {
            Self::Transfer { from, to, token_id } => {
                abi::Transfer { from: *from, to: *to, tokenId: U256::from(*token_id) }
                    .encode_log_data()
            }
            Self::Approval { owner, approved, token_id } => abi::Approval {
                owner: *owner,
                approved: *approved,
                tokenId: U256::from(*token_id),
            }
            .encode_log_data(),
            Self::ApprovalForAll { owner, operator, approved } => {
                abi::ApprovalForAll { owner: *owner, operator: *operator, approved: *approved }
                    .encode_log_data()
            }
            Self::FreeMintBegins => abi::FreeMintBegins {}.encode_log_data(),
            Self::PreSaleBegins => abi::PreSaleBegins {}.encode_log_data(),
            Self::SaleBegins => abi::SaleBegins {}.encode_log_data(),
            Self::SaleEnds => abi::SaleEnds {}.encode_log_data(),
            Self::Paused { account } => abi::Paused { account: *account }.encode_log_data(),
            Self::Unpaused { account } => abi::Unpaused { account: *account }.encode_log_data(),
            Self::SetBaseUri { base_uri } => {
                abi::SetBaseURI { baseURI: base_uri.clone() }.encode_log_data()
            }
            Self::OwnershipTransferred { previous_owner, new_owner } => {
                abi::OwnershipTransferred { previousOwner: *previous_owner, newOwner: *new_owner }
                    .encode_log_data()
            }
        };
        Log { address: emitter, data }
    }
}

impl From<TransferRecord> for MintEvent {
    fn from(record: TransferRecord) -> Self {
        Self::Transfer { from: record.from, to: record.to, token_id: record.token_id }
    }
}

impl From<OwnershipTransfer> for MintEvent {
    fn from(transfer: OwnershipTransfer) -> Self {
        Self::OwnershipTransferred {
            previous_owner: transfer.previous_owner,
            new_owner: transfer.new_owner,
        }
    }
}
