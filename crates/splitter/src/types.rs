use alloy_primitives::{Address, U256};
use evo_common::BASIS_POINTS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a beneficiary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    /// Receiving address. Re-pointable by the owner.
    pub address: Address,
    /// Share in basis points.
    pub share_bps: u16,
}

/// Asset held by a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    /// The chain's native currency.
    Native,
    /// A fungible token identified by its contract address.
    Erc20(Address),
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Erc20(token) => write!(f, "erc20:{token}"),
        }
    }
}

/// What to do with the dust floor division leaves behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResiduePolicy {
    /// Dust stays in the vault and joins the next withdrawal.
    #[default]
    Retain,
    /// The last beneficiary receives `balance - sum(previous shares)`.
    SweepToLast,
}

/// A beneficiary table plus its residue policy.
// Shares must add up to exactly BASIS_POINTS; see `SplitterConfig::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterConfig {
    /// Ordered beneficiary table. Payouts follow this order.
    pub beneficiaries: Vec<Beneficiary>,
    /// Dust handling, `Retain` unless configured.
    #[serde(default)]
    pub residue: ResiduePolicy,
}

impl SplitterConfig {
    /// Sum of all shares.
    pub fn total_bps(&self) -> u32 {
        self.beneficiaries.iter().map(|b| u32::from(b.share_bps)).sum()
    }

    /// Returns true if the shares cover the whole balance.
    pub fn is_complete(&self) -> bool {
        self.total_bps() == u32::from(BASIS_POINTS)
    }
}

/// One transfer out of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    /// Asset being moved.
    pub asset: AssetKind,
    /// Recipient.
    pub to: Address,
    /// Amount in the asset's smallest unit.
    pub amount: U256,
}

/// Outcome of splitting one balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    /// Non-zero transfers in table order.
    pub payouts: Vec<Payout>,
    /// Sum of `payouts`.
    pub distributed: U256,
    /// Amount left in the vault.
    pub residue: U256,
}
