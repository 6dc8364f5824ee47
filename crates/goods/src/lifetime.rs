//! Lifetime goods: owned once, forever.

use tradepost_core::{ItemKind, StoreResult};
use tradepost_storage::GoodsStorage;

use crate::good::{ensure_positive, Good, GoodError};
use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::Record;

/// A good with binary ownership instead of a counted balance.
///
/// The stored balance is clamped to 0/1: giving any positive amount sets it
/// to one, taking any positive amount resets it to zero. Once owned it is
/// no longer buyable.
#[derive(Debug, Clone, PartialEq)]
pub struct LifetimeGood {
    details: ItemDetails,
    pub(crate) purchase: Option<PurchaseType>,
}

impl LifetimeGood {
    pub fn new(details: ItemDetails, purchase: Option<PurchaseType>) -> Self {
        Self { details, purchase }
    }

    pub fn from_record(record: &Record) -> StoreResult<Self> {
        Ok(Self::new(
            ItemDetails::from_record(record)?,
            PurchaseType::from_record(record)?,
        ))
    }

    pub fn is_owned(&self, storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        Ok(storage.balance(self.details.id())? > 0)
    }
}

impl Good for LifetimeGood {
    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Lifetime
    }

    fn purchase_type(&self) -> Option<&PurchaseType> {
        self.purchase.as_ref()
    }

    fn can_buy(&self, storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        Ok(!self.is_owned(storage)?)
    }

    fn give(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        Ok(storage.set_balance(self.details.id(), 1)?)
    }

    fn take(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError> {
        ensure_positive(amount)?;
        Ok(storage.set_balance(self.details.id(), 0)?)
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
