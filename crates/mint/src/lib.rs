//! # Evolution mint engine
//!
//! Phase-gated minting for the Evolution collection.
//!
//! | Module | Role |
//! |--------|------|
//! | [`phase`] | sale lifecycle and pause flag |
//! | [`authorizer`] | signed mint requests, nonce replay, source-unit allowances |
//! | [`whitelist`] | Merkle-proof pre-sale membership |
//! | [`engine`] | entry points composing the above with supply and fund splitting |
//! | [`shared`] | lock-guarded handle for concurrent callers |
//! | [`events`] | emitted records and their EVM log encoding |
//! | [`config`] | engine configuration from JSON or environment |
//!
//! Mint paths by phase:
//!
//! - `FREE_MINT`: holders of the source collection, one free unit and one
//!   discounted unit per held source unit.
//! - `PRE_SALE`: whitelisted addresses, one discounted unit each.
//! - `SALE`: anyone with a signed request, at the sale price.
//!
//! Every paid path needs a request signed by the trusted signer, and every
//! nonce is single use. The owner may mint from the reserved pool at any time.

pub mod authorizer;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod phase;
pub mod shared;
pub mod whitelist;

#[cfg(test)]
mod test_utils;

pub use authorizer::{AuthError, MintAuthorizer, SourceUnitFlags, UsageCategory};
pub use config::{ConfigError, MintConfig};
pub use engine::{CallContext, MintEngine};
pub use error::{ErrorKind, MintError};
pub use events::MintEvent;
pub use phase::{PhaseError, SalePhase, SalePhaseController};
pub use shared::SharedMintEngine;
pub use whitelist::{WhitelistError, WhitelistState};
