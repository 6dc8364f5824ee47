//! The in-memory item catalog.

use std::collections::HashMap;

use tradepost_core::{ItemId, ItemKind, StoreError, StoreResult};
use tradepost_goods::{
    EquippableGood, Good, LifetimeGood, SingleUseGood, SingleUsePackGood, VirtualCurrency,
    VirtualItem,
};

/// Immutable-after-load catalog mapping item ids to resolved items.
///
/// The registry is the single authority on item identity: `register` is the
/// only place id uniqueness is enforced. Lookups are stable; resolving the
/// same id twice yields the same instance.
///
/// Typed accessors (`single_use`, `currency`, …) replace downcasting:
/// asking for the wrong variant fails with `StoreError::UnexpectedKind`
/// instead of panicking.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<ItemId, VirtualItem>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item, failing with `DuplicateItem` if the id is taken.
    pub fn register(&mut self, item: impl Into<VirtualItem>) -> StoreResult<()> {
        let item = item.into();
        let id = item.id().clone();
        if self.items.contains_key(&id) {
            return Err(StoreError::duplicate(id));
        }
        self.items.insert(id, item);
        Ok(())
    }

    pub fn get(&self, item_id: &ItemId) -> StoreResult<&VirtualItem> {
        self.items
            .get(item_id)
            .ok_or_else(|| StoreError::not_found(item_id.clone()))
    }

    /// The shared give/take/buy capability of any registered item.
    pub fn good(&self, item_id: &ItemId) -> StoreResult<&dyn Good> {
        Ok(self.get(item_id)?.as_good())
    }

    pub fn currency(&self, item_id: &ItemId) -> StoreResult<&VirtualCurrency> {
        match self.get(item_id)? {
            VirtualItem::Currency(currency) => Ok(currency),
            other => Err(StoreError::unexpected_kind(
                item_id.clone(),
                ItemKind::Currency,
                other.kind(),
            )),
        }
    }

    pub fn single_use(&self, item_id: &ItemId) -> StoreResult<&SingleUseGood> {
        match self.get(item_id)? {
            VirtualItem::SingleUse(good) => Ok(good),
            other => Err(StoreError::unexpected_kind(
                item_id.clone(),
                ItemKind::SingleUse,
                other.kind(),
            )),
        }
    }

    pub fn pack(&self, item_id: &ItemId) -> StoreResult<&SingleUsePackGood> {
        match self.get(item_id)? {
            VirtualItem::SingleUsePack(pack) => Ok(pack),
            other => Err(StoreError::unexpected_kind(
                item_id.clone(),
                ItemKind::SingleUsePack,
                other.kind(),
            )),
        }
    }

    pub fn lifetime(&self, item_id: &ItemId) -> StoreResult<&LifetimeGood> {
        match self.get(item_id)? {
            VirtualItem::Lifetime(good) => Ok(good),
            other => Err(StoreError::unexpected_kind(
                item_id.clone(),
                ItemKind::Lifetime,
                other.kind(),
            )),
        }
    }

    pub fn equippable(&self, item_id: &ItemId) -> StoreResult<&EquippableGood> {
        match self.get(item_id)? {
            VirtualItem::Equippable(good) => Ok(good),
            other => Err(StoreError::unexpected_kind(
                item_id.clone(),
                ItemKind::Equippable,
                other.kind(),
            )),
        }
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VirtualItem> {
        self.items.values()
    }
}
