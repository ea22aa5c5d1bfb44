use crate::{authorizer::AuthError, config::ConfigError, phase::PhaseError, whitelist::WhitelistError};
use evo_common::OwnershipError;
use evo_ledger::{LedgerError, LedgerErrorKind};
use evo_splitter::SplitterError;
use serde::Serialize;
use thiserror::Error;

/// Coarse category of a rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Phase ordering or pause state.
    State,
    /// Bad signature, proof or source-unit ownership.
    Auth,
    /// Nonce, source unit or whitelist slot already consumed.
    Replay,
    /// A supply ceiling would be crossed.
    Capacity,
    /// Not enough value attached, or nothing to withdraw.
    Payment,
    /// Caller lacks the privilege.
    Permission,
    /// The queried unit does not exist.
    Lookup,
    /// Malformed input such as a zero recipient or a URI without `/`.
    Invalid,
    /// Invalid engine configuration.
    Config,
}

/// Every way an engine entry point can fail. Failed calls change nothing.
#[derive(Debug, Error)]
pub enum MintError {
    /// See [`PhaseError`].
    #[error(transparent)]
    Phase(#[from] PhaseError),
    /// See [`AuthError`].
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// See [`WhitelistError`].
    #[error(transparent)]
    Whitelist(#[from] WhitelistError),
    /// See [`LedgerError`].
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// See [`OwnershipError`].
    #[error(transparent)]
    Ownership(#[from] OwnershipError),
    /// See [`SplitterError`].
    #[error(transparent)]
    Splitter(#[from] SplitterError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Base URIs must end with `/`.
    #[error("Must set trailing slash")]
    MissingTrailingSlash,
    /// Metadata requested for a unit that does not exist.
    #[error("URI query for nonexistent token")]
    UriForNonexistentToken {
        /// Requested unit.
        token_id: u64,
    },
}

impl MintError {
    /// Category of the failure.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Phase(_) => ErrorKind::State,
            Self::Auth(err) => match err {
                AuthError::SignatureMismatch { .. } | AuthError::TokenNotOwned { .. } => {
                    ErrorKind::Auth
                }
                AuthError::NonceReused { .. } | AuthError::TokenAlreadyUsed { .. } => {
                    ErrorKind::Replay
                }
            },
            Self::Whitelist(err) => match err {
                WhitelistError::InvalidProof { .. } => ErrorKind::Auth,
                WhitelistError::AlreadyUsed { .. } => ErrorKind::Replay,
            },
            Self::Ledger(err) => match err.kind() {
                LedgerErrorKind::Capacity => ErrorKind::Capacity,
                LedgerErrorKind::Payment => ErrorKind::Payment,
                LedgerErrorKind::Permission => ErrorKind::Permission,
                LedgerErrorKind::Lookup => ErrorKind::Lookup,
                LedgerErrorKind::Invalid => ErrorKind::Invalid,
            },
            Self::Ownership(_) => ErrorKind::Permission,
            Self::Splitter(err) => match err {
                SplitterError::Ownership(_) => ErrorKind::Permission,
                SplitterError::Config(_) => ErrorKind::Config,
                SplitterError::BalanceZero { .. }
                | SplitterError::BalanceOverflow { .. }
                | SplitterError::InsufficientBalance { .. } => ErrorKind::Payment,
                SplitterError::UnknownBeneficiary { .. } | SplitterError::ZeroBeneficiary => {
                    ErrorKind::Invalid
                }
            },
            Self::Config(_) => ErrorKind::Config,
            Self::MissingTrailingSlash => ErrorKind::Invalid,
            Self::UriForNonexistentToken { .. } => ErrorKind::Lookup,
        }
    }
}
