//! Common constants and primitives for the Evolution mint.

pub mod access;
pub mod constants;
pub mod merkle;
pub mod request;

pub use access::{OwnershipError, OwnershipGuard, OwnershipTransfer};
pub use constants::*;
pub use merkle::{hash_pair, leaf_hash, process_proof, verify_proof};
pub use request::{MintRequest, SignatureCheckError};
