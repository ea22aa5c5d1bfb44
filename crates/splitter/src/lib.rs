//! Splits collected balances among a fixed table of beneficiaries.
//!
//! Shares are expressed in basis points and computed with floor division. What
//! happens to the rounding dust is governed by [`ResiduePolicy`].

pub mod apply;
pub mod compute;
pub mod config;
pub mod error;
pub mod splitter;
pub mod treasury;
pub mod types;
pub mod vault;

pub use apply::*;
pub use compute::*;
pub use config::*;
pub use error::SplitterError;
pub use splitter::FundSplitter;
pub use treasury::Treasury;
pub use types::*;
pub use vault::Vault;
