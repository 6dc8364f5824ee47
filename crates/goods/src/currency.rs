//! Virtual currency: a counted item that pays for other items.

use tradepost_core::ItemKind;
use tradepost_storage::GoodsStorage;

use crate::good::{ensure_positive, Good, GoodError};
use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::Record;

/// A counted balance with no purchase flow of its own.
///
/// Currencies are credited by packs or reward flows and debited by
/// virtual-item purchases; they are never bought directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualCurrency {
    details: ItemDetails,
}

impl VirtualCurrency {
    pub fn new(details: ItemDetails) -> Self {
        Self { details }
    }

    pub fn from_record(record: &Record) -> tradepost_core::StoreResult<Self> {
        Ok(Self::new(ItemDetails::from_record(record)?))
    }
}

impl Good for VirtualCurrency {
    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Currency
    }

    fn purchase_type(&self) -> Option<&PurchaseType> {
        None
    }

    fn can_buy(&self, _storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        Ok(false)
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
        record
    }
}
