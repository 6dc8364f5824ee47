//! Flat structured-record format shared by all virtual items.
//!
//! Every item persists as one flat key-value document: base fields and
//! variant fields merged into a single map, never nested. Unknown keys are
//! ignored on read so catalogs written by newer versions stay loadable.

use serde_json::Value;

use tradepost_core::{StoreError, StoreResult};

/// One persisted item: a flat key-value document.
pub type Record = serde_json::Map<String, Value>;

/// Recognized record keys.
pub mod keys {
    pub const ITEM_ID: &str = "itemId";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";

    pub const GOOD_ITEM_ID: &str = "goodItemId";
    pub const GOOD_AMOUNT: &str = "goodAmount";

    pub const PURCHASE_TYPE: &str = "purchaseType";
    pub const MARKET_PRODUCT_ID: &str = "marketProductId";
    pub const MARKET_PRICE: &str = "marketPrice";
    pub const PAYER_ITEM_ID: &str = "payerItemId";
    pub const PRICE: &str = "price";
}

pub(crate) fn require_str<'a>(record: &'a Record, key: &str) -> StoreResult<&'a str> {
    match record.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(StoreError::malformed(format!("'{key}' must be a string"))),
        None => Err(StoreError::malformed(format!("missing required key '{key}'"))),
    }
}

pub(crate) fn require_u64(record: &Record, key: &str) -> StoreResult<u64> {
    match record.get(key) {
        Some(value) => value
            .as_u64()
            .ok_or_else(|| StoreError::malformed(format!("'{key}' must be a non-negative integer"))),
        None => Err(StoreError::malformed(format!("missing required key '{key}'"))),
    }
}

pub(crate) fn require_f64(record: &Record, key: &str) -> StoreResult<f64> {
    match record.get(key) {
        Some(value) => value
            .as_f64()
            .ok_or_else(|| StoreError::malformed(format!("'{key}' must be a number"))),
        None => Err(StoreError::malformed(format!("missing required key '{key}'"))),
    }
}

/// Reads an optional string key; present-but-wrong-type is still malformed.
pub(crate) fn opt_str<'a>(record: &'a Record, key: &str) -> StoreResult<Option<&'a str>> {
    match record.get(key) {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(StoreError::malformed(format!("'{key}' must be a string"))),
        None => Ok(None),
    }
}
