//! Engine configuration.

use alloy_primitives::{Address, B256, U256};
use evo_common::{
    DEFAULT_BASE_URI, MAX_BATCH_MINT, MAX_SUPPLY, PRE_SALE_PRICE, RESERVED_SUPPLY, SALE_PRICE,
};
use evo_ledger::SupplyLimits;
use evo_splitter::{primary_split, ConfigError as SplitterConfigError, SplitterConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{env, str::FromStr};
use thiserror::Error;

/// Environment variable holding the owner address.
pub const OWNER_ENV: &str = "EVO_MINT_OWNER";
/// Environment variable holding the trusted signer address.
pub const SIGNER_ENV: &str = "EVO_MINT_SIGNER";
/// Environment variable holding the source collection address.
pub const SOURCE_COLLECTION_ENV: &str = "EVO_MINT_SOURCE_COLLECTION";
/// Environment variable holding the metadata base URI.
pub const BASE_URI_ENV: &str = "EVO_MINT_BASE_URI";
/// Environment variable holding the initial whitelist root.
pub const MERKLE_ROOT_ENV: &str = "EVO_MINT_MERKLE_ROOT";
/// Environment variable holding the public unit price in wei.
pub const SALE_PRICE_ENV: &str = "EVO_MINT_SALE_PRICE";
/// Environment variable holding the discounted unit price in wei.
pub const PRE_SALE_PRICE_ENV: &str = "EVO_MINT_PRE_SALE_PRICE";

/// Key of the engine section in a genesis-style extras document.
pub const EXTRAS_KEY: &str = "evolution";

/// Everything needed to construct a [`crate::MintEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MintConfig {
    /// Privileged account.
    pub owner: Address,
    /// Off-chain key whose signatures authorize mints.
    pub signer: Address,
    /// Address of the collection whose holders get early access.
    pub source_collection: Address,
    /// Hard cap on units ever minted.
    pub max_supply: u64,
    /// Per-transaction and per-wallet ceiling.
    pub max_batch_mint: u64,
    /// Owner-directed pool size.
    pub reserved_supply: u64,
    /// Public unit price in wei.
    pub sale_price: U256,
    /// Discounted unit price in wei.
    pub pre_sale_price: U256,
    /// Metadata base, must end with `/`.
    pub base_uri: String,
    /// Initial whitelist root.
    pub merkle_root: Option<B256>,
    /// Split applied to the collection's own withdrawals.
    pub withdrawal: SplitterConfig,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            owner: Address::ZERO,
            signer: Address::ZERO,
            source_collection: Address::ZERO,
            max_supply: MAX_SUPPLY,
            max_batch_mint: MAX_BATCH_MINT,
            reserved_supply: RESERVED_SUPPLY,
            sale_price: SALE_PRICE,
            pre_sale_price: PRE_SALE_PRICE,
            base_uri: DEFAULT_BASE_URI.to_string(),
            merkle_root: None,
            withdrawal: primary_split(),
        }
    }
}

impl MintConfig {
    /// Production defaults with the given owner and signer.
    pub fn new(owner: Address, signer: Address) -> Self {
        Self { owner, signer, ..Default::default() }
    }

    /// Supply ceilings as consumed by the ledger.
    pub const fn limits(&self) -> SupplyLimits {
        SupplyLimits {
            max_supply: self.max_supply,
            max_batch_mint: self.max_batch_mint,
            reserved_supply: self.reserved_supply,
        }
    }

    /// Reads the `evolution` object of a genesis-style JSON document.
    ///
    /// Missing fields fall back to the production defaults.
    pub fn from_extras(extras: &Value) -> Result<Self, ConfigError> {
        let section = extras.get(EXTRAS_KEY).ok_or(ConfigError::MissingExtras)?;
        serde_json::from_value(section.clone()).map_err(|e| ConfigError::InvalidExtras(e.to_string()))
    }

    /// Loads the configuration from `EVO_MINT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| -> Result<String, ConfigError> {
            let raw = lookup(var).ok_or_else(|| ConfigError::MissingEnv { var: var.into() })?;
            if raw.trim().is_empty() {
                return Err(ConfigError::EmptyEnv { var: var.into() });
            }
            Ok(raw.trim().to_string())
        };
        let optional = |var: &str| lookup(var).map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty());

        let mut config = Self::new(
            parse_value(OWNER_ENV, &required(OWNER_ENV)?)?,
            parse_value(SIGNER_ENV, &required(SIGNER_ENV)?)?,
        );
        if let Some(raw) = optional(SOURCE_COLLECTION_ENV) {
            config.source_collection = parse_value(SOURCE_COLLECTION_ENV, &raw)?;
        }
        if let Some(raw) = optional(BASE_URI_ENV) {
            config.base_uri = raw;
        }
        if let Some(raw) = optional(MERKLE_ROOT_ENV) {
            config.merkle_root = Some(parse_value(MERKLE_ROOT_ENV, &raw)?);
        }
        if let Some(raw) = optional(SALE_PRICE_ENV) {
            config.sale_price = parse_value(SALE_PRICE_ENV, &raw)?;
        }
        if let Some(raw) = optional(PRE_SALE_PRICE_ENV) {
            config.pre_sale_price = parse_value(PRE_SALE_PRICE_ENV, &raw)?;
        }
        Ok(config)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::ZeroOwner);
        }
        if self.signer.is_zero() {
            return Err(ConfigError::ZeroSigner);
        }
        if self.max_batch_mint == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        if self.reserved_supply > self.max_supply {
            return Err(ConfigError::ReservedExceedsSupply {
                reserved: self.reserved_supply,
                max_supply: self.max_supply,
            });
        }
        if !self.base_uri.ends_with('/') {
            return Err(ConfigError::BaseUriWithoutSlash);
        }
        self.withdrawal.validate()?;
        Ok(())
    }
}

/// Errors that can occur while loading or validating a [`MintConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("environment variable {var} is not set")]
    MissingEnv {
        /// Name of the variable.
        var: String,
    },
    /// A required environment variable was empty or whitespace.
    #[error("environment variable {var} is empty")]
    EmptyEnv {
        /// Name of the variable.
        var: String,
    },
    /// A value could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidValue {
        /// Variable or field the value came from.
        var: String,
        /// Parser message.
        reason: String,
    },
    /// The extras document has no `evolution` section.
    #[error("missing evolution config in extras")]
    MissingExtras,
    /// The `evolution` section does not deserialize.
    #[error("invalid evolution config: {0}")]
    InvalidExtras(String),
    /// The owner is the zero address.
    #[error("owner cannot be the zero address")]
    ZeroOwner,
    /// The signer is the zero address.
    #[error("signer cannot be the zero address")]
    ZeroSigner,
    /// The batch ceiling is zero, so nothing could ever be minted.
    #[error("maxBatchMint must be greater than zero")]
    ZeroBatch,
    /// The reserved pool is larger than the collection.
    #[error("reserved supply {reserved} exceeds max supply {max_supply}")]
    ReservedExceedsSupply {
        /// Configured pool.
        reserved: u64,
        /// Configured cap.
        max_supply: u64,
    },
    /// The base URI does not end with `/`.
    #[error("Must set trailing slash")]
    BaseUriWithoutSlash,
    /// The withdrawal table is malformed.
    #[error(transparent)]
    Splitter(#[from] SplitterConfigError),
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(raw).map_err(|err| ConfigError::InvalidValue { var: var.into(), reason: err.to_string() })
}
