//! Balances held by a splitting contract.

use crate::{error::SplitterError, types::AssetKind};
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;

/// Native balance plus one balance per fungible token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    native: U256,
    tokens: BTreeMap<Address, U256>,
}

impl Vault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `asset`.
    pub fn balance(&self, asset: AssetKind) -> U256 {
        match asset {
            AssetKind::Native => self.native,
            AssetKind::Erc20(token) => self.tokens.get(&token).copied().unwrap_or_default(),
        }
    }

    /// Credits `amount` of `asset` and returns the new balance.
    pub fn deposit(&mut self, asset: AssetKind, amount: U256) -> Result<U256, SplitterError> {
        let slot = self.slot_mut(asset);
        let updated = slot.checked_add(amount).ok_or(SplitterError::BalanceOverflow { asset })?;
        *slot = updated;
        Ok(updated)
    }

    /// Fails if crediting `amount` of `asset` would overflow.
    pub fn check_deposit(&self, asset: AssetKind, amount: U256) -> Result<(), SplitterError> {
        self.balance(asset)
            .checked_add(amount)
            .map(drop)
            .ok_or(SplitterError::BalanceOverflow { asset })
    }

    /// Debits `amount` of `asset` and returns the new balance.
    pub fn debit(&mut self, asset: AssetKind, amount: U256) -> Result<U256, SplitterError> {
        let available = self.balance(asset);
        let updated = available.checked_sub(amount).ok_or(SplitterError::InsufficientBalance {
            asset,
            available,
            requested: amount,
        })?;
        *self.slot_mut(asset) = updated;
        Ok(updated)
    }

    /// Assets with a non-zero balance.
    pub fn assets(&self) -> Vec<AssetKind> {
        let native = (!self.native.is_zero()).then_some(AssetKind::Native);
        native
            .into_iter()
            .chain(
                self.tokens
                    .iter()
                    .filter(|(_, balance)| !balance.is_zero())
                    .map(|(token, _)| AssetKind::Erc20(*token)),
            )
            .collect()
    }

    fn slot_mut(&mut self, asset: AssetKind) -> &mut U256 {
        match asset {
            AssetKind::Native => &mut self.native,
            AssetKind::Erc20(token) => self.tokens.entry(token).or_default(),
        }
    }
}
