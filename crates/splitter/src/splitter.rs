//! Vault plus beneficiary table.

use crate::{apply::payout_plan, error::SplitterError, types::*, vault::Vault};
use alloy_primitives::{Address, U256};

/// Holds balances and splits them across a beneficiary table on withdrawal.
///
/// Carries no access control of its own; wrap it (see [`crate::Treasury`]) or
/// gate calls at the owning component.
#[derive(Debug, Clone)]
pub struct FundSplitter {
    config: SplitterConfig,
    vault: Vault,
}

impl FundSplitter {
    /// Creates a splitter over a validated table with an empty vault.
    pub fn new(config: SplitterConfig) -> Result<Self, SplitterError> {
        config.validate()?;
        Ok(Self { config, vault: Vault::new() })
    }

    /// Current beneficiary table.
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Held balances.
    pub const fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Balance of `asset` awaiting withdrawal.
    pub fn balance(&self, asset: AssetKind) -> U256 {
        self.vault.balance(asset)
    }

    /// Address at table position `index`.
    pub fn beneficiary(&self, index: usize) -> Option<Address> {
        self.config.beneficiaries.get(index).map(|b| b.address)
    }

    /// Credits incoming funds.
    pub fn deposit(&mut self, asset: AssetKind, amount: U256) -> Result<U256, SplitterError> {
        self.vault.deposit(asset, amount)
    }

    /// Read-only form of [`Self::deposit`].
    pub fn check_deposit(&self, asset: AssetKind, amount: U256) -> Result<(), SplitterError> {
        self.vault.check_deposit(asset, amount)
    }

    /// Re-points the beneficiary at `index`; its share is unchanged.
    ///
    /// Returns the previous address.
    pub fn set_beneficiary(&mut self, index: usize, address: Address) -> Result<Address, SplitterError> {
        if address.is_zero() {
            return Err(SplitterError::ZeroBeneficiary);
        }
        let len = self.config.beneficiaries.len();
        let row = self
            .config
            .beneficiaries
            .get_mut(index)
            .ok_or(SplitterError::UnknownBeneficiary { index, len })?;
        let previous = std::mem::replace(&mut row.address, address);
        tracing::info!(index, %previous, new = %address, "beneficiary updated");
        Ok(previous)
    }

    /// Splits the whole balance of `asset` and debits what is paid out.
    pub fn withdraw_all(&mut self, asset: AssetKind) -> Result<SplitPlan, SplitterError> {
        let balance = self.vault.balance(asset);
        if balance.is_zero() {
            return Err(SplitterError::BalanceZero { asset });
        }

        let plan = payout_plan(&self.config, asset, balance);
        self.vault.debit(asset, plan.distributed)?;

        tracing::info!(
            %asset,
            %balance,
            distributed = %plan.distributed,
            residue = %plan.residue,
            payouts = plan.payouts.len(),
            "balance withdrawn"
        );
        Ok(plan)
    }
}
