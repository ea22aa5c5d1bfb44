//! Integration tests for the Evolution mint engine.
//!
//! The suites drive [`evo_mint::MintEngine`] through whole sale lifecycles
//! with real signatures, Merkle proofs and a populated source collection.


#[cfg(test)]
mod concurrency_tests;
#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod treasury_tests;

pub use common::*;
