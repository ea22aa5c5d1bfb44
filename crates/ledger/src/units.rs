//! Base unit ownership ledger.
//!
//! Units are numbered sequentially from zero in mint order. Burned ids are
//! never reissued.

use crate::{error::LedgerError, source::SourceCollection};
use alloy_primitives::Address;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One ownership change. Mints come from the zero address, burns go to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Previous holder.
    pub from: Address,
    /// New holder.
    pub to: Address,
    /// Unit that moved.
    pub token_id: u64,
}

/// Ownership, balances and approvals for every minted unit.
#[derive(Debug, Clone, Default)]
pub struct UnitLedger {
    owners: BTreeMap<u64, Address>,
    balances: HashMap<Address, u64>,
    token_approvals: HashMap<u64, Address>,
    operators: HashSet<(Address, Address)>,
    next_id: u64,
    burned: u64,
}

impl UnitLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Units minted so far, including burned ones. Also the next id to assign.
    pub const fn total_minted(&self) -> u64 {
        self.next_id
    }

    /// Units currently in existence.
    pub const fn total_supply(&self) -> u64 {
        self.next_id - self.burned
    }

    /// Returns true if `token_id` was minted and not burned.
    pub fn exists(&self, token_id: u64) -> bool {
        self.owners.contains_key(&token_id)
    }

    /// Holder of `token_id`.
    pub fn owner_of(&self, token_id: u64) -> Result<Address, LedgerError> {
        self.owners.get(&token_id).copied().ok_or(LedgerError::NonexistentToken { token_id })
    }

    /// Number of units held by `owner`.
    pub fn balance_of(&self, owner: Address) -> u64 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    /// Account approved for `token_id`, if any.
    pub fn get_approved(&self, token_id: u64) -> Result<Option<Address>, LedgerError> {
        self.owner_of(token_id)?;
        Ok(self.token_approvals.get(&token_id).copied())
    }

    /// Returns true if `operator` may manage every unit of `owner`.
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operators.contains(&(owner, operator))
    }

    /// Returns true if `spender` owns `token_id` or is approved for it.
    pub fn is_approved_or_owner(&self, spender: Address, token_id: u64) -> Result<bool, LedgerError> {
        let owner = self.owner_of(token_id)?;
        Ok(spender == owner
            || self.token_approvals.get(&token_id) == Some(&spender)
            || self.is_approved_for_all(owner, spender))
    }

    /// Registers `quantity` new units to `to` with ascending ids.
    pub fn mint(&mut self, to: Address, quantity: u64) -> Result<Vec<TransferRecord>, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        if to.is_zero() {
            return Err(LedgerError::MintToZeroAddress);
        }

        let first = self.next_id;
        let records = (first..first + quantity)
            .map(|token_id| {
                self.owners.insert(token_id, to);
                TransferRecord { from: Address::ZERO, to, token_id }
            })
            .collect();
        *self.balances.entry(to).or_default() += quantity;
        self.next_id += quantity;

        tracing::debug!(%to, first, quantity, "units minted");
        Ok(records)
    }

    /// Approves `to` for `token_id`. `Address::ZERO` clears the approval.
    ///
    /// Returns the unit's owner.
    pub fn approve(
        &mut self,
        caller: Address,
        to: Address,
        token_id: u64,
    ) -> Result<Address, LedgerError> {
        let owner = self.owner_of(token_id)?;
        if to == owner {
            return Err(LedgerError::ApprovalToCurrentOwner);
        }
        if caller != owner && !self.is_approved_for_all(owner, caller) {
            return Err(LedgerError::NotOwnerOrApproved { caller, token_id });
        }

        if to.is_zero() {
            self.token_approvals.remove(&token_id);
        } else {
            self.token_approvals.insert(token_id, to);
        }
        Ok(owner)
    }

    /// Grants or revokes `operator` over every unit of `owner`.
    pub fn set_approval_for_all(
        &mut self,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if owner == operator {
            return Err(LedgerError::ApproveToCaller);
        }
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
        Ok(())
    }

    /// Moves `token_id` from `from` to `to` on behalf of `caller`.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: u64,
    ) -> Result<TransferRecord, LedgerError> {
        let owner = self.owner_of(token_id)?;
        if !self.is_approved_or_owner(caller, token_id)? {
            return Err(LedgerError::NotOwnerOrApproved { caller, token_id });
        }
        if owner != from {
            return Err(LedgerError::TransferFromIncorrectOwner { from, token_id });
        }
        if to.is_zero() {
            return Err(LedgerError::TransferToZeroAddress);
        }

        self.token_approvals.remove(&token_id);
        self.debit(from);
        *self.balances.entry(to).or_default() += 1;
        self.owners.insert(token_id, to);

        Ok(TransferRecord { from, to, token_id })
    }

    /// Destroys `token_id` on behalf of `caller`.
    pub fn burn(&mut self, caller: Address, token_id: u64) -> Result<TransferRecord, LedgerError> {
        let owner = self.owner_of(token_id)?;
        if !self.is_approved_or_owner(caller, token_id)? {
            return Err(LedgerError::NotOwnerOrApproved { caller, token_id });
        }

        self.token_approvals.remove(&token_id);
        self.owners.remove(&token_id);
        self.debit(owner);
        self.burned += 1;

        tracing::debug!(%owner, token_id, "unit burned");
        Ok(TransferRecord { from: owner, to: Address::ZERO, token_id })
    }

    fn debit(&mut self, owner: Address) {
        if let Some(balance) = self.balances.get_mut(&owner) {
            *balance = balance.saturating_sub(1);
            if *balance == 0 {
                self.balances.remove(&owner);
            }
        }
    }
}

impl SourceCollection for UnitLedger {
    fn holder_of(&self, token_id: u64) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }
}
