use crate::types::*;
use alloy_primitives::Address;
use evo_common::{
    BASIS_POINTS, DEFAULT_PARTNER_BENEFICIARY, DEFAULT_PRIMARY_BENEFICIARY, DEFAULT_TEAM_MEMBERS,
};
use serde_json::Value;
use thiserror::Error;

/// Share table of the collection contract: 70% / 30%.
pub const PRIMARY_SHARES: [u16; 2] = [7_000, 3_000];
/// Share table of the royalty receiver: 70% / 30%.
pub const ROYALTY_SHARES: [u16; 2] = [7_000, 3_000];
/// Share table of the team treasury: 70% / 20% / 3.3% / 3.3% / 3.4%.
pub const TREASURY_SHARES: [u16; 5] = [7_000, 2_000, 330, 330, 340];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing splitter config")]
    Missing,
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("beneficiary table is empty")]
    Empty,
    #[error("beneficiary shares sum to {total} basis points, expected 10000")]
    ShareSum { total: u32 },
    #[error("beneficiary {index} has the zero address")]
    ZeroAddress { index: usize },
    #[error("{addresses} addresses for {shares} shares")]
    LengthMismatch { addresses: usize, shares: usize },
}

impl SplitterConfig {
    /// Rejects empty tables, zero addresses and shares that do not sum to 10000.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beneficiaries.is_empty() {
            return Err(ConfigError::Empty);
        }
        if let Some(index) = self.beneficiaries.iter().position(|b| b.address.is_zero()) {
            return Err(ConfigError::ZeroAddress { index });
        }
        if !self.is_complete() {
            return Err(ConfigError::ShareSum { total: self.total_bps() });
        }
        Ok(())
    }
}

/// Reads a splitter table from `extras[key]`.
///
/// Expected shape (example):
/// {
///   "treasury": {
///     "beneficiaries": [
///       { "address": "0x6ab7...9D30", "shareBps": 7000 },
///       { "address": "0x901F...Cc16", "shareBps": 3000 }
///     ],
///     "residue": "retain"
///   }
/// }
pub fn parse_splitter_config(extras: &Value, key: &str) -> Result<SplitterConfig, ConfigError> {
    let raw = extras.get(key).ok_or(ConfigError::Missing)?;
    let cfg = serde_json::from_value::<SplitterConfig>(raw.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Zips addresses with shares into a validated table.
pub fn build_config(
    addresses: &[Address],
    shares: &[u16],
    residue: ResiduePolicy,
) -> Result<SplitterConfig, ConfigError> {
    if addresses.len() != shares.len() {
        return Err(ConfigError::LengthMismatch {
            addresses: addresses.len(),
            shares: shares.len(),
        });
    }
    let cfg = SplitterConfig {
        beneficiaries: addresses
            .iter()
            .zip(shares)
            .map(|(address, share_bps)| Beneficiary { address: *address, share_bps: *share_bps })
            .collect(),
        residue,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Two-way table of the collection contract with the default addresses.
pub fn primary_split() -> SplitterConfig {
    fixed_table(&[DEFAULT_PRIMARY_BENEFICIARY, DEFAULT_PARTNER_BENEFICIARY], &PRIMARY_SHARES)
}

/// Two-way table of the royalty receiver with the default addresses.
pub fn royalty_split() -> SplitterConfig {
    fixed_table(&[DEFAULT_PRIMARY_BENEFICIARY, DEFAULT_PARTNER_BENEFICIARY], &ROYALTY_SHARES)
}

/// Five-way team treasury table with the default addresses.
pub fn treasury_split() -> SplitterConfig {
    let [c, d, e] = DEFAULT_TEAM_MEMBERS;
    fixed_table(&[DEFAULT_PRIMARY_BENEFICIARY, DEFAULT_PARTNER_BENEFICIARY, c, d, e], &TREASURY_SHARES)
}

fn fixed_table(addresses: &[Address], shares: &[u16]) -> SplitterConfig {
    debug_assert_eq!(shares.iter().map(|s| u32::from(*s)).sum::<u32>(), u32::from(BASIS_POINTS));
    SplitterConfig {
        beneficiaries: addresses
            .iter()
            .zip(shares)
            .map(|(address, share_bps)| Beneficiary { address: *address, share_bps: *share_bps })
            .collect(),
        residue: ResiduePolicy::default(),
    }
}
