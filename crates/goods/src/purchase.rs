//! Purchase type strategies: how acquiring a good is fulfilled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tradepost_core::{ItemId, StoreError, StoreResult};

use crate::record::{keys, opt_str, require_f64, require_str, require_u64, Record};

const TYPE_MARKET: &str = "market";
const TYPE_VIRTUAL_ITEM: &str = "virtualItem";

/// External market listing backing a market purchase.
///
/// The product id and price are references into the platform store; the
/// actual transaction happens in the billing collaborator, outside this
/// library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketProduct {
    pub product_id: String,
    pub price: f64,
}

/// Price expressed in units of another virtual item (usually a currency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualItemPrice {
    pub payer_item_id: ItemId,
    pub price: u64,
}

/// Strategy describing how "buy" is fulfilled for a purchasable item.
///
/// Orthogonal to the good's give/take behavior: the same single-use good can
/// be sold for coins today and on the market tomorrow without touching its
/// balance semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PurchaseType {
    /// Fulfilled by the external platform market; settles asynchronously
    /// via a confirmed receipt.
    Market(MarketProduct),
    /// Fulfilled by debiting another virtual item's balance.
    VirtualItem(VirtualItemPrice),
}

impl PurchaseType {
    pub fn with_market(product_id: impl Into<String>, price: f64) -> Self {
        PurchaseType::Market(MarketProduct {
            product_id: product_id.into(),
            price,
        })
    }

    pub fn with_virtual_item(payer_item_id: impl Into<ItemId>, price: u64) -> Self {
        PurchaseType::VirtualItem(VirtualItemPrice {
            payer_item_id: payer_item_id.into(),
            price,
        })
    }

    /// Reads the purchase-type keys out of a record.
    ///
    /// A record without a `purchaseType` key describes a non-purchasable
    /// item; an unrecognized tag or missing price field is malformed.
    pub fn from_record(record: &Record) -> StoreResult<Option<Self>> {
        let tag = match opt_str(record, keys::PURCHASE_TYPE)? {
            Some(tag) => tag,
            None => return Ok(None),
        };

        match tag {
            TYPE_MARKET => {
                let product_id = require_str(record, keys::MARKET_PRODUCT_ID)?;
                let price = require_f64(record, keys::MARKET_PRICE)?;
                Ok(Some(Self::with_market(product_id, price)))
            }
            TYPE_VIRTUAL_ITEM => {
                let payer = require_str(record, keys::PAYER_ITEM_ID)?;
                let price = require_u64(record, keys::PRICE)?;
                Ok(Some(Self::with_virtual_item(payer, price)))
            }
            other => Err(StoreError::malformed(format!(
                "unrecognized purchaseType '{other}'"
            ))),
        }
    }

    pub(crate) fn write_record(&self, record: &mut Record) {
        match self {
            PurchaseType::Market(market) => {
                record.insert(keys::PURCHASE_TYPE.into(), Value::from(TYPE_MARKET));
                record.insert(
                    keys::MARKET_PRODUCT_ID.into(),
                    Value::from(market.product_id.as_str()),
                );
                record.insert(keys::MARKET_PRICE.into(), Value::from(market.price));
            }
            PurchaseType::VirtualItem(price) => {
                record.insert(keys::PURCHASE_TYPE.into(), Value::from(TYPE_VIRTUAL_ITEM));
                record.insert(
                    keys::PAYER_ITEM_ID.into(),
                    Value::from(price.payer_item_id.as_str()),
                );
                record.insert(keys::PRICE.into(), Value::from(price.price));
            }
        }
    }
}
