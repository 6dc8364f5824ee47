//! Equippable goods: lifetime ownership plus an equipped flag.

use tradepost_core::{ItemKind, StoreResult};
use tradepost_storage::GoodsStorage;

use crate::good::{ensure_positive, Good, GoodError};
use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::Record;

/// A lifetime good the player can additionally equip.
///
/// Equipping requires ownership; taking the good away also unequips it so
/// the equipped flag can never outlive the balance.
#[derive(Debug, Clone, PartialEq)]
pub struct EquippableGood {
    details: ItemDetails,
    pub(crate) purchase: Option<PurchaseType>,
}

impl EquippableGood {
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

    pub fn is_equipped(&self, storage: &dyn GoodsStorage) -> Result<bool, GoodError> {
        Ok(storage.is_equipped(self.details.id())?)
    }

    /// Fails with [`GoodError::NotOwned`] if the good has not been acquired.
    pub fn equip(&self, storage: &dyn GoodsStorage) -> Result<(), GoodError> {
        if !self.is_owned(storage)? {
            return Err(GoodError::NotOwned {
                item_id: self.details.id().clone(),
            });
        }
        Ok(storage.set_equipped(self.details.id(), true)?)
    }

    pub fn unequip(&self, storage: &dyn GoodsStorage) -> Result<(), GoodError> {
        Ok(storage.set_equipped(self.details.id(), false)?)
    }
}

impl Good for EquippableGood {
    fn details(&self) -> &ItemDetails {
        &self.details
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Equippable
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
        let balance = storage.set_balance(self.details.id(), 0)?;
        storage.set_equipped(self.details.id(), false)?;
        Ok(balance)
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
