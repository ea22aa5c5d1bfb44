//! # Evolution unit ledger
//!
//! Base ownership bookkeeping and supply accounting for the collection.
//!
//! | Type | Role |
//! |------|------|
//! | [`UnitLedger`] | who owns which unit, balances, approvals, transfers, burns |
//! | [`SupplyLedger`] | capacity rules: batch and wallet ceilings, max supply, reserved pool |
//! | [`SourceCollection`] | read-only ownership view of the external collection that grants early access |
//!
//! Every mutating call either completes or returns an error without touching
//! state. Ownership changes are reported as [`TransferRecord`]s so the caller
//! can publish them.

pub mod error;
pub mod source;
pub mod supply;
pub mod units;

pub use error::{LedgerError, LedgerErrorKind};
pub use source::SourceCollection;
pub use supply::{check_payment, SupplyLedger, SupplyLimits};
pub use units::{TransferRecord, UnitLedger};
