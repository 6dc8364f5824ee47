//! Single-use goods: consumables with a counted balance.

use tradepost_core::{ItemKind, StoreResult};
use tradepost_storage::GoodsStorage;

use crate::good::{ensure_positive, Good, GoodError};
use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::Record;

/// A consumable good whose balance lives in storage, keyed by its item id.
///
/// Can be purchased an unlimited number of times; spending one decrements
/// the balance, never below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleUseGood {
    details: ItemDetails,
    pub(crate) purchase: Option<PurchaseType>,
}

impl SingleUseGood {
    pub fn new(details: ItemDetails, purchase: Option<PurchaseType>) -> Self {
        Self { details, purchase }
    }

    pub fn from_record(record: &Record) -> StoreResult<Self> {
        Ok(Self::new(
            ItemDetails::from_record(record)?,
            PurchaseType::from_record(record)?,
        ))
    }
}

impl Good for SingleUseGood {
    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn kind(&self) -> ItemKind {
        ItemKind::SingleUse
    }

    fn purchase_type(&self) -> Option<&PurchaseType> {
        self.purchase.as_ref()
    }

    fn can_buy(&self, _storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        Ok(true)
    }

    fn give(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        Ok(storage.add(self.details.id(), amount)?)
    }

    fn take(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        Ok(storage.remove(self.details.id(), amount)?)
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.details.write_record(&mut record);
        if let Some(purchase) = &self.purchase {
            purchase.write_record(&mut record);
        }
        record
    }
}
