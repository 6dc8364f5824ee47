use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use tradepost_core::ItemId;

use crate::store::{GoodsStorage, StorageError};

#[derive(Debug, Default)]
struct AccountState {
    balances: HashMap<ItemId, u64>,
    equipped: HashSet<ItemId>,
}

/// In-memory balance store.
///
/// One global lock guards all mutation, which serializes concurrent
/// give/take on the same underlying id (e.g. a pack and a direct good
/// racing on one balance). Intended for tests/dev and as the reference
/// implementation for durable key-value backends.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<AccountState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GoodsStorage for InMemoryStorage {
    fn balance(&self, item_id: &ItemId) -> Result<u64, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(state.balances.get(item_id).copied().unwrap_or(0))
    }

    fn add(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        let balance = state.balances.entry(item_id.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(*balance)
    }

    fn remove(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        let balance = state.balances.entry(item_id.clone()).or_insert(0);
        *balance = balance.saturating_sub(amount);
        Ok(*balance)
    }

    fn set_balance(&self, item_id: &ItemId, amount: u64) -> Result<u64, StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        state.balances.insert(item_id.clone(), amount);
        Ok(amount)
    }

    fn is_equipped(&self, item_id: &ItemId) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(state.equipped.contains(item_id))
    }

    fn set_equipped(&self, item_id: &ItemId, equipped: bool) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        if equipped {
            state.equipped.insert(item_id.clone());
        } else {
            state.equipped.remove(item_id);
        }
        Ok(())
    }
}
