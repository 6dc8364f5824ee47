//! Balance storage contract consumed by the goods domain.

use std::sync::Arc;

use thiserror::Error;

use tradepost_core::ItemId;

/// Storage operation error.
///
/// These are **infrastructure errors** (locking, backend IO) as opposed to
/// domain errors (validation, lookups). Goods surface them unchanged to
/// their callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Balance store for a single local account.
///
/// This is the single source of truth for every counted balance and every
/// ownership/equip flag, keyed by item id. Multiple goods may mutate the
/// same id (a direct good and any number of packs referencing it) and must
/// observe one consistent counter.
///
/// ## Mutation semantics
///
/// - `add` and `set_balance` return the new balance.
/// - `remove` saturates at zero and returns the new balance; a balance can
///   never go negative, whatever amount is requested.
/// - An id that was never written reads as balance `0`, not equipped.
///
/// ## Concurrency
///
/// Implementations must serialize mutations per item id (one lock per id or
/// one global lock) so that concurrent `add`/`remove`/`set_balance` calls on
/// the same id never lose updates. Reads may be concurrent.
///
/// ## Implementation requirements
///
/// Implementations must not panic on business input; lock poisoning and
/// backend IO failures map to `StorageError`.
pub trait GoodsStorage: Send + Sync {
    /// Current balance for an item id (`0` if never written).
    fn balance(&self, item_id: &ItemId) -> Result<u64, StorageError>;

    /// Credit `amount` units and return the new balance.
    fn add(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError>;

    /// Debit up to `amount` units, saturating at zero, and return the new
    /// balance.
    fn remove(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError>;

    /// Overwrite the balance and return it.
    fn set_balance(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError>;

    /// Whether the item is currently equipped.
    fn is_equipped(&self, item_id: &ItemId) -> Result<bool, StorageError>;

    /// Set or clear the equipped flag.
    fn set_equipped(&self, item_id: &ItemId, equipped: bool) -> Result<(), StorageError>;
}

impl<S> GoodsStorage for Arc<S>
where
    S: GoodsStorage + ?Sized,
{
    fn balance(&self, item_id: &ItemId) -> Result<u64, StorageError> {
        (**self).balance(item_id)
    }

    fn add(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        (**self).add(item_id, amount)
    }

    fn remove(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        (**self).remove(item_id, amount)
    }

    fn set_balance(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        (**self).set_balance(item_id, amount)
    }

    fn is_equipped(&self, item_id: &ItemId) -> Result<bool, StorageError> {
        (**self).is_equipped(item_id)
    }

    fn set_equipped(&self, item_id: &ItemId, equipped: bool) -> Result<(), StorageError> {
        (**self).set_equipped(item_id, equipped)
    }
}
