//! The capability contract shared by every acquirable item.

use thiserror::Error;

use tradepost_core::{ItemId, ItemKind, StoreError};
use tradepost_storage::{GoodsStorage, StorageError};

use crate::item::ItemDetails;
use crate::purchase::PurchaseType;
use crate::record::Record;

/// Error from a give/take/equip operation on a good.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoodError {
    /// Zero was passed where a positive amount is required.
    #[error("amount must be positive")]
    InvalidAmount,

    /// The pack's referenced good was never resolved against the registry.
    #[error("pack '{pack}' has no usable referenced good '{good}'")]
    BrokenReference { pack: ItemId, good: ItemId },

    /// An equip was attempted on a good that is not owned.
    #[error("virtual item '{item_id}' is not owned")]
    NotOwned { item_id: ItemId },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Catalog(#[from] StoreError),
}

/// Behavior shared by all good variants.
///
/// Each variant keeps its own fields flat and implements this contract;
/// balance state always lives in the [`GoodsStorage`] passed in, never in
/// the good itself.
///
/// `give` and `take` return the new effective balance. `take` saturates at
/// zero; a balance never goes negative. Both reject a zero amount with
/// [`GoodError::InvalidAmount`] before touching storage.
pub trait Good {
    /// Identity and display metadata.
    fn details(&self) -> &ItemDetails;

    /// Variant tag.
    fn kind(&self) -> ItemKind;

    /// How a purchase of this good is fulfilled, if it is purchasable at all.
    fn purchase_type(&self) -> Option<&PurchaseType>;

    /// Whether a purchase attempt would currently be allowed.
    ///
    /// Packs with a resolved reference always return `true` (unlimited
    /// repeat purchases); lifetime goods return `false` once owned.
    fn can_buy(&self, storage: &dyn GoodsStorage) -> Result<bool, GoodError>;

    /// Credit `amount` units and return the new effective balance.
    fn give(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError>;

    /// Debit up to `amount` units, saturating at zero, and return the new
    /// effective balance.
    fn take(&self, storage: &dyn GoodsStorage, amount: u64) -> Result<u64, GoodError>;

    /// Serialize to one flat structured record (base + variant fields).
    fn to_record(&self) -> Record;
}

pub(crate) fn ensure_positive(amount: u64) -> Result<(), GoodError> {
    if amount == 0 {
        return Err(GoodError::InvalidAmount);
    }
    Ok(())
}
