//! Supply accounting on top of the unit ledger.
//!
//! [`SupplyLedger`] is the single writer of the minted and reserved counters.
//! Each mint path has a read-only `check_*` twin so a caller can validate a
//! whole request before committing anything.

use crate::{
    error::LedgerError,
    units::{TransferRecord, UnitLedger},
};
use alloy_primitives::{Address, U256};
use evo_common::{MAX_BATCH_MINT, MAX_SUPPLY, RESERVED_SUPPLY};
use serde::{Deserialize, Serialize};

/// Capacity ceilings of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyLimits {
    /// Hard cap on units ever minted.
    pub max_supply: u64,
    /// Per-transaction ceiling, also applied to a wallet's total holdings on
    /// public paths.
    pub max_batch_mint: u64,
    /// Size of the owner-directed pool.
    pub reserved_supply: u64,
}

impl Default for SupplyLimits {
    fn default() -> Self {
        Self {
            max_supply: MAX_SUPPLY,
            max_batch_mint: MAX_BATCH_MINT,
            reserved_supply: RESERVED_SUPPLY,
        }
    }
}

/// Minted/reserved counters plus the unit ledger they govern.
#[derive(Debug, Clone)]
pub struct SupplyLedger {
    limits: SupplyLimits,
    reserved_remaining: u64,
    units: UnitLedger,
}

impl Default for SupplyLedger {
    fn default() -> Self {
        Self::new(SupplyLimits::default())
    }
}

impl SupplyLedger {
    /// Creates an empty ledger with the full reserved pool available.
    pub fn new(limits: SupplyLimits) -> Self {
        Self { limits, reserved_remaining: limits.reserved_supply, units: UnitLedger::new() }
    }

    /// Configured ceilings.
    pub const fn limits(&self) -> &SupplyLimits {
        &self.limits
    }

    /// Units left in the reserved pool.
    pub const fn reserved_remaining(&self) -> u64 {
        self.reserved_remaining
    }

    /// Units minted so far, burned ones included.
    pub const fn total_minted(&self) -> u64 {
        self.units.total_minted()
    }

    /// Units currently in existence.
    pub const fn total_supply(&self) -> u64 {
        self.units.total_supply()
    }

    /// Units that can still be minted before hitting max supply.
    pub const fn remaining_supply(&self) -> u64 {
        self.limits.max_supply.saturating_sub(self.units.total_minted())
    }

    /// Read access to ownership data.
    pub const fn units(&self) -> &UnitLedger {
        &self.units
    }

    /// Validates a public-path mint of `quantity` units to `requester`.
    pub fn check_open_mint(&self, requester: Address, quantity: u64) -> Result<(), LedgerError> {
        self.check_batch(quantity)?;
        check_recipient(requester)?;

        let held = self.units.balance_of(requester);
        if held.saturating_add(quantity) > self.limits.max_batch_mint {
            return Err(LedgerError::WalletCapExceeded { wallet: requester, held, quantity });
        }

        self.check_supply(quantity)
    }

    /// Validates an owner-directed mint of `quantity` units from the reserved pool.
    pub fn check_reserve_mint(&self, to: Address, quantity: u64) -> Result<(), LedgerError> {
        self.check_batch(quantity)?;
        check_recipient(to)?;

        if quantity > self.reserved_remaining {
            return Err(LedgerError::ReservedExhausted {
                quantity,
                remaining: self.reserved_remaining,
            });
        }

        self.check_supply(quantity)
    }

    /// Mints on the public path.
    pub fn open_mint(
        &mut self,
        requester: Address,
        quantity: u64,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        self.check_open_mint(requester, quantity)?;
        self.units.mint(requester, quantity)
    }

    /// Mints one unit per listed source id on the early-access path.
    pub fn free_mint(
        &mut self,
        requester: Address,
        free_ids: &[u64],
        pre_sale_ids: &[u64],
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        let quantity = (free_ids.len() + pre_sale_ids.len()) as u64;
        self.open_mint(requester, quantity)
    }

    /// Mints from the reserved pool and shrinks it.
    pub fn reserve_mint(
        &mut self,
        to: Address,
        quantity: u64,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        self.check_reserve_mint(to, quantity)?;
        let records = self.units.mint(to, quantity)?;
        self.reserved_remaining -= quantity;
        tracing::debug!(%to, quantity, reserved_remaining = self.reserved_remaining, "reserved mint");
        Ok(records)
    }

    /// Destroys a unit. Max-supply headroom is not given back.
    pub fn burn(&mut self, caller: Address, token_id: u64) -> Result<TransferRecord, LedgerError> {
        self.units.burn(caller, token_id)
    }

    /// See [`UnitLedger::approve`].
    pub fn approve(
        &mut self,
        caller: Address,
        to: Address,
        token_id: u64,
    ) -> Result<Address, LedgerError> {
        self.units.approve(caller, to, token_id)
    }

    /// See [`UnitLedger::set_approval_for_all`].
    pub fn set_approval_for_all(
        &mut self,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), LedgerError> {
        self.units.set_approval_for_all(owner, operator, approved)
    }

    /// See [`UnitLedger::transfer_from`].
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: u64,
    ) -> Result<TransferRecord, LedgerError> {
        self.units.transfer_from(caller, from, to, token_id)
    }

    fn check_batch(&self, quantity: u64) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        if quantity > self.limits.max_batch_mint {
            return Err(LedgerError::BatchTooLarge { quantity, max: self.limits.max_batch_mint });
        }
        Ok(())
    }

    fn check_supply(&self, quantity: u64) -> Result<(), LedgerError> {
        let remaining = self.remaining_supply();
        if quantity > remaining {
            return Err(LedgerError::SupplyExhausted { quantity, remaining });
        }
        Ok(())
    }
}

fn check_recipient(to: Address) -> Result<(), LedgerError> {
    if to.is_zero() {
        return Err(LedgerError::MintToZeroAddress);
    }
    Ok(())
}

/// Checks that `value` covers `units` at `unit_price` and returns the order total.
pub fn check_payment(value: U256, unit_price: U256, units: u64) -> Result<U256, LedgerError> {
    let required = unit_price.checked_mul(U256::from(units)).ok_or(LedgerError::PaymentOverflow)?;
    if value < required {
        return Err(LedgerError::InsufficientPayment { required, provided: value });
    }
    Ok(required)
}
