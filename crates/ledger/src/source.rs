//! The external collection whose holders qualify for early access.

use alloy_primitives::Address;
use std::sync::Arc;

/// Read-only ownership view of an external collection.
///
/// Holding a unit of the source collection is what makes a wallet eligible for
/// the free and discounted early-access path.
pub trait SourceCollection {
    /// Current holder of `token_id`, or `None` if it does not exist.
    fn holder_of(&self, token_id: u64) -> Option<Address>;

    /// Returns true when `account` currently holds `token_id`.
    fn is_held_by(&self, token_id: u64, account: Address) -> bool {
        self.holder_of(token_id) == Some(account)
    }
}

impl<T: SourceCollection + ?Sized> SourceCollection for Arc<T> {
    fn holder_of(&self, token_id: u64) -> Option<Address> {
        (**self).holder_of(token_id)
    }
}

impl<T: SourceCollection + ?Sized> SourceCollection for &T {
    fn holder_of(&self, token_id: u64) -> Option<Address> {
        (**self).holder_of(token_id)
    }
}
