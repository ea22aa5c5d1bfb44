//! Stand-alone owner-gated splitting contract.
//!
//! Used for the royalty receiver and the team treasury, which only receive
//! funds and pay them out.

use crate::{error::SplitterError, splitter::FundSplitter, types::*};
use alloy_primitives::{Address, U256};
use evo_common::{OwnershipGuard, OwnershipTransfer};

/// A [`FundSplitter`] whose configuration and withdrawals are owner-only.
#[derive(Debug, Clone)]
pub struct Treasury {
    guard: OwnershipGuard,
    splitter: FundSplitter,
}

impl Treasury {
    /// Creates a treasury owned by `owner`.
    pub fn new(owner: Address, config: SplitterConfig) -> Result<Self, SplitterError> {
        Ok(Self { guard: OwnershipGuard::new(owner), splitter: FundSplitter::new(config)? })
    }

    /// Current owner.
    pub const fn owner(&self) -> Address {
        self.guard.owner()
    }

    /// Current beneficiary table.
    pub const fn config(&self) -> &SplitterConfig {
        self.splitter.config()
    }

    /// Address at table position `index`.
    pub fn beneficiary(&self, index: usize) -> Option<Address> {
        self.splitter.beneficiary(index)
    }

    /// Balance of `asset` awaiting withdrawal.
    pub fn balance(&self, asset: AssetKind) -> U256 {
        self.splitter.balance(asset)
    }

    /// Accepts funds from anyone.
    pub fn deposit(&mut self, asset: AssetKind, amount: U256) -> Result<U256, SplitterError> {
        self.splitter.deposit(asset, amount)
    }

    /// Owner-only: re-points the beneficiary at `index`.
    pub fn set_beneficiary(
        &mut self,
        caller: Address,
        index: usize,
        address: Address,
    ) -> Result<Address, SplitterError> {
        self.guard.ensure_owner(caller)?;
        self.splitter.set_beneficiary(index, address)
    }

    /// Owner-only: hands the treasury to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<OwnershipTransfer, SplitterError> {
        Ok(self.guard.transfer_ownership(caller, new_owner)?)
    }

    /// Owner-only: splits the whole balance of `asset` and returns the transfers to make.
    pub fn withdraw_all(
        &mut self,
        caller: Address,
        asset: AssetKind,
    ) -> Result<Vec<Payout>, SplitterError> {
        self.guard.ensure_owner(caller)?;
        Ok(self.splitter.withdraw_all(asset)?.payouts)
    }
}
