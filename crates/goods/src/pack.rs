//! Single-use packs: bundles that credit another good by a multiplier.

use serde_json::Value;

use tradepost_core::{ItemId, ItemKind, StoreError, StoreResult};
use tradepost_storage::GoodsStorage;

use crate::good::{ensure_positive, Good, GoodError};
use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::{keys, require_str, require_u64, Record};

/// A bundle of `good_amount` units of one single-use good.
///
/// The pack holds no balance of its own: giving or taking `n` packs moves
/// `n * good_amount` units of the referenced good. The reference is by id,
/// resolved against the registry after the whole catalog is constructed;
/// until [`link`](SingleUsePackGood::link) confirms the target, the pack is
/// degraded and every operation fails with [`GoodError::BrokenReference`].
#[derive(Debug, Clone, PartialEq)]
pub struct SingleUsePackGood {
    details: ItemDetails,
    pub(crate) purchase: Option<PurchaseType>,
    good_item_id: ItemId,
    good_amount: u64,
    linked: bool,
}

impl SingleUsePackGood {
    /// Fails with `Validation` if `good_amount` is zero.
    pub fn new(
        details: ItemDetails,
        purchase: Option<PurchaseType>,
        good_item_id: impl Into<ItemId>,
        good_amount: u64,
    ) -> StoreResult<Self> {
        if good_amount == 0 {
            return Err(StoreError::validation("goodAmount must be positive"));
        }
        Ok(Self {
            details,
            purchase,
            good_item_id: good_item_id.into(),
            good_amount,
            linked: false,
        })
    }

    pub fn from_record(record: &Record) -> StoreResult<Self> {
        let details = ItemDetails::from_record(record)?;
        let purchase = PurchaseType::from_record(record)?;
        let good_item_id = require_str(record, keys::GOOD_ITEM_ID)?;
        let good_amount = require_u64(record, keys::GOOD_AMOUNT)?;
        Self::new(details, purchase, good_item_id, good_amount)
    }

    /// Id of the referenced single-use good, as written in the catalog.
    pub fn good_item_id(&self) -> &ItemId {
        &self.good_item_id
    }

    /// Units of the referenced good granted per pack.
    pub fn good_amount(&self) -> u64 {
        self.good_amount
    }

    /// Whether registry resolution confirmed the referenced good.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Marks the reference as resolved.
    ///
    /// Called by registry resolution once the referenced id is known to name
    /// a single-use good.
    pub fn link(&mut self) {
        self.linked = true;
    }

    fn ensure_linked(&self) -> Result<(), GoodError> {
        if !self.linked {
            return Err(GoodError::BrokenReference {
                pack: self.details.id().clone(),
                good: self.good_item_id.clone(),
            });
        }
        Ok(())
    }
}

impl Good for SingleUsePackGood {
    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn kind(&self) -> ItemKind {
        ItemKind::SingleUsePack
    }

    fn purchase_type(&self) -> Option<&PurchaseType> {
        self.purchase.as_ref()
    }

    fn can_buy(&self, _storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        // Unlimited repeat purchases, but a degraded pack is excluded from
        // purchasable flows.
        Ok(self.linked)
    }

    fn give(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        self.ensure_linked()?;
        Ok(storage.add(&self.good_item_id, self.good_amount.saturating_mul(amount))?)
    }

    fn take(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        self.ensure_linked()?;
        Ok(storage.remove(&self.good_item_id, self.good_amount.saturating_mul(amount))?)
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.details.write_record(&mut record);
        if let Some(purchase) = &self.purchase {
            purchase.write_record(&mut record);
        }
        record.insert(keys::GOOD_ITEM_ID.into(), Value::from(self.good_item_id.as_str()));
        record.insert(keys::GOOD_AMOUNT.into(), Value::from(self.good_amount));
        record
    }
}
