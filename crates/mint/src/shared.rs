//! Thread-safe handle over a [`MintEngine`].

use crate::engine::MintEngine;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle that serializes mutating calls on one engine.
///
/// Each closure passed to [`Self::write`] runs under the write lock, so a
/// whole entry point (checks plus commit) is observed atomically by every
/// other handle. Queries share the read lock.
#[derive(Debug)]
pub struct SharedMintEngine<S> {
    inner: Arc<RwLock<MintEngine<S>>>,
}

impl<S> Clone for SharedMintEngine<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> SharedMintEngine<S> {
    /// Wraps `engine`.
    pub fn new(engine: MintEngine<S>) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    /// Runs `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut MintEngine<S>) -> R) -> R {
        // parking_lot locks do not poison
        f(&mut self.inner.write())
    }

    /// Runs `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&MintEngine<S>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<S> From<MintEngine<S>> for SharedMintEngine<S> {
    fn from(engine: MintEngine<S>) -> Self {
        Self::new(engine)
    }
}
