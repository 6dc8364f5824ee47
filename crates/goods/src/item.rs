//! Shared identity/metadata and the sum type over all item variants.

use serde_json::Value;

use tradepost_core::{ItemId, ItemKind, StoreError, StoreResult};

use crate::currency::VirtualCurrency;
use crate::equippable::EquippableGood;
use crate::good::Good;
use crate::lifetime::LifetimeGood;
use crate::pack::SingleUsePackGood;
use crate::purchase::PurchaseType;
use crate::record::{keys, require_str, Record};
use crate::single_use::SingleUseGood;

/// Identity and display metadata embedded by every item variant.
///
/// The id is immutable after construction; uniqueness is the registry's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    id: ItemId,
    name: String,
    description: String,
}

impl ItemDetails {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn from_record(record: &Record) -> StoreResult<Self> {
        let id = require_str(record, keys::ITEM_ID)?;
        if id.is_empty() {
            return Err(StoreError::validation("itemId cannot be empty"));
        }
        let name = require_str(record, keys::NAME)?;
        let description = require_str(record, keys::DESCRIPTION)?;
        Ok(Self::new(id, name, description))
    }

    pub(crate) fn write_record(&self, record: &mut Record) {
        record.insert(keys::ITEM_ID.into(), Value::from(self.id.as_str()));
        record.insert(keys::NAME.into(), Value::from(self.name.as_str()));
        record.insert(keys::DESCRIPTION.into(), Value::from(self.description.as_str()));
    }
}

/// Any entity in the economy, tagged by variant.
///
/// The registry stores and returns this sum type; callers match on the
/// variant (or use the typed registry accessors) instead of downcasting.
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualItem {
    Currency(VirtualCurrency),
    SingleUse(SingleUseGood),
    SingleUsePack(SingleUsePackGood),
    Lifetime(LifetimeGood),
    Equippable(EquippableGood),
}

impl VirtualItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            VirtualItem::Currency(_) => ItemKind::Currency,
            VirtualItem::SingleUse(_) => ItemKind::SingleUse,
            VirtualItem::SingleUsePack(_) => ItemKind::SingleUsePack,
            VirtualItem::Lifetime(_) => ItemKind::Lifetime,
            VirtualItem::Equippable(_) => ItemKind::Equippable,
        }
    }

    pub fn details(&self) -> &ItemDetails {
        self.as_good().details()
    }

    pub fn id(&self) -> &ItemId {
        self.details().id()
    }

    /// The shared give/take/buy capability of the underlying variant.
    pub fn as_good(&self) -> &dyn Good {
        match self {
            VirtualItem::Currency(c) => c,
            VirtualItem::SingleUse(g) => g,
            VirtualItem::SingleUsePack(p) => p,
            VirtualItem::Lifetime(g) => g,
            VirtualItem::Equippable(g) => g,
        }
    }

    pub fn purchase_type(&self) -> Option<&PurchaseType> {
        self.as_good().purchase_type()
    }

    /// Strip the purchase type, leaving the item non-purchasable.
    ///
    /// Registry resolution uses this to degrade items whose purchase type
    /// references an unresolvable payer.
    pub fn remove_purchase(&mut self) -> Option<PurchaseType> {
        match self {
            VirtualItem::Currency(_) => None,
            VirtualItem::SingleUse(g) => g.purchase.take(),
            VirtualItem::SingleUsePack(p) => p.purchase.take(),
            VirtualItem::Lifetime(g) => g.purchase.take(),
            VirtualItem::Equippable(g) => g.purchase.take(),
        }
    }

    pub fn to_record(&self) -> Record {
        self.as_good().to_record()
    }
}

impl From<VirtualCurrency> for VirtualItem {
    fn from(value: VirtualCurrency) -> Self {
        VirtualItem::Currency(value)
    }
}

impl From<SingleUseGood> for VirtualItem {
    fn from(value: SingleUseGood) -> Self {
        VirtualItem::SingleUse(value)
    }
}

impl From<SingleUsePackGood> for VirtualItem {
    fn from(value: SingleUsePackGood) -> Self {
        VirtualItem::SingleUsePack(value)
    }
}

impl From<LifetimeGood> for VirtualItem {
    fn from(value: LifetimeGood) -> Self {
        VirtualItem::Lifetime(value)
    }
}

impl From<EquippableGood> for VirtualItem {
    fn from(value: EquippableGood) -> Self {
        VirtualItem::Equippable(value)
    }
}
