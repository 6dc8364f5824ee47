//! The economy context: registry + storage + purchase fulfillment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use tradepost_core::{ItemId, ReceiptId};
use tradepost_goods::{Good, GoodError, PurchaseType};
use tradepost_storage::GoodsStorage;

use crate::registry::ItemRegistry;

/// Purchase fulfillment error.
///
/// A failed purchase performs no balance mutation: the bought good is only
/// credited after the payment leg has fully succeeded.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PurchaseError {
    /// The item has no purchase type, or its state forbids buying
    /// (already-owned lifetime good, degraded pack).
    #[error("virtual item '{item_id}' cannot be purchased")]
    NotPurchasable { item_id: ItemId },

    #[error("insufficient funds: '{payer}' holds {balance}, price is {price}")]
    InsufficientFunds {
        payer: ItemId,
        price: u64,
        balance: u64,
    },

    /// The external billing collaborator refused or failed the transaction.
    #[error("billing gateway failure: {0}")]
    Billing(String),

    /// A market confirmation did not match the item's listed product.
    #[error("market receipt does not match virtual item '{item_id}'")]
    ReceiptMismatch { item_id: ItemId },

    #[error(transparent)]
    Good(#[from] GoodError),
}

/// A market transaction handed to the billing collaborator.
///
/// Returned from `buy` as the pending half of an asynchronous market
/// purchase; the host feeds it back through `confirm_market_purchase`
/// once the platform confirms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrder {
    item_id: ItemId,
    product_id: String,
    price: f64,
}

impl MarketOrder {
    pub fn new(item_id: impl Into<ItemId>, product_id: impl Into<String>, price: f64) -> Self {
        Self {
            item_id: item_id.into(),
            product_id: product_id.into(),
            price,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// How a settled purchase was paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payment {
    Market { product_id: String, price: f64 },
    VirtualItem { payer_item_id: ItemId, price: u64 },
}

/// Proof of a settled purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    receipt_id: ReceiptId,
    item_id: ItemId,
    payment: Payment,
    settled_at: DateTime<Utc>,
}

impl PurchaseReceipt {
    pub fn receipt_id(&self) -> ReceiptId {
        self.receipt_id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }
}

/// Outcome of a `buy`: settled on the spot, or pending external billing.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Settled(PurchaseReceipt),
    Pending(MarketOrder),
}

/// Boundary to the platform billing collaborator.
///
/// `launch` hands the order to the external market flow and returns once
/// the request is dispatched; the confirmed transaction comes back through
/// [`Economy::confirm_market_purchase`].
pub trait BillingGateway {
    fn launch(&self, order: &MarketOrder) -> Result<(), PurchaseError>;
}

/// Explicitly constructed context owning the item registry and the balance
/// storage for one local account.
///
/// Built at catalog load, dropped on account reset; there is no ambient
/// singleton. Mutating operations are serialized by the storage's own
/// locking, so an `Economy` shared behind `Arc` stays consistent when a
/// billing callback races a direct give/take.
pub struct Economy {
    registry: ItemRegistry,
    storage: Arc<dyn GoodsStorage>,
}

impl Economy {
    pub fn new(registry: ItemRegistry, storage: Arc<dyn GoodsStorage>) -> Self {
        Self { registry, storage }
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &dyn GoodsStorage {
        self.storage.as_ref()
    }

    /// Current effective balance for an item.
    pub fn balance(&self, item_id: &ItemId) -> Result<u64, GoodError> {
        self.registry.get(item_id)?;
        Ok(self.storage.balance(item_id)?)
    }

    /// Credit `amount` units of an item and return the new balance.
    pub fn give(&self, item_id: &ItemId, amount: u64) -> Result<u64, GoodError> {
        let balance = self.registry.good(item_id)?.give(self.storage.as_ref(), amount)?;
        debug!(item = %item_id, amount, balance, "credited");
        Ok(balance)
    }

    /// Debit up to `amount` units (saturating) and return the new balance.
    pub fn take(&self, item_id: &ItemId, amount: u64) -> Result<u64, GoodError> {
        let balance = self.registry.good(item_id)?.take(self.storage.as_ref(), amount)?;
        debug!(item = %item_id, amount, balance, "debited");
        Ok(balance)
    }

    pub fn equip(&self, item_id: &ItemId) -> Result<(), GoodError> {
        self.registry.equippable(item_id)?.equip(self.storage.as_ref())
    }

    pub fn unequip(&self, item_id: &ItemId) -> Result<(), GoodError> {
        self.registry.equippable(item_id)?.unequip(self.storage.as_ref())
    }

    /// Buys one unit of a purchasable item.
    ///
    /// Virtual-item purchases settle synchronously: the payer is debited
    /// only after the price check passes, and the good is credited only
    /// after the debit succeeds. Market purchases return
    /// [`PurchaseOutcome::Pending`] once the order is handed to the
    /// gateway; nothing is credited until the confirmation arrives.
    pub fn buy(
        &self,
        item_id: &ItemId,
        gateway: &dyn BillingGateway,
    ) -> Result<PurchaseOutcome, PurchaseError> {
        let good = self.registry.good(item_id).map_err(GoodError::from)?;
        let purchase = good
            .purchase_type()
            .ok_or_else(|| PurchaseError::NotPurchasable {
                item_id: item_id.clone(),
            })?
            .clone();

        if !good.can_buy(self.storage.as_ref())? {
            return Err(PurchaseError::NotPurchasable {
                item_id: item_id.clone(),
            });
        }

        match purchase {
            PurchaseType::Market(market) => {
                let order = MarketOrder::new(item_id.clone(), market.product_id, market.price);
                gateway.launch(&order)?;
                debug!(item = %item_id, product = %order.product_id(), "market purchase dispatched");
                Ok(PurchaseOutcome::Pending(order))
            }
            PurchaseType::VirtualItem(price) => {
                let payer = self
                    .registry
                    .good(&price.payer_item_id)
                    .map_err(GoodError::from)?;
                let balance = self
                    .storage
                    .balance(&price.payer_item_id)
                    .map_err(GoodError::from)?;
                if balance < price.price {
                    return Err(PurchaseError::InsufficientFunds {
                        payer: price.payer_item_id.clone(),
                        price: price.price,
                        balance,
                    });
                }

                if price.price > 0 {
                    payer.take(self.storage.as_ref(), price.price)?;
                }
                good.give(self.storage.as_ref(), 1)?;

                info!(item = %item_id, payer = %price.payer_item_id, price = price.price, "virtual-item purchase settled");
                Ok(PurchaseOutcome::Settled(self.receipt(
                    item_id,
                    Payment::VirtualItem {
                        payer_item_id: price.payer_item_id,
                        price: price.price,
                    },
                )))
            }
        }
    }

    /// Completion callback for a market purchase.
    ///
    /// Verifies the order against the item's current market listing, then
    /// credits the good with one unit.
    pub fn confirm_market_purchase(
        &self,
        order: &MarketOrder,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let good = self.registry.good(order.item_id()).map_err(GoodError::from)?;
        match good.purchase_type() {
            Some(PurchaseType::Market(market)) if market.product_id == order.product_id() => {}
            _ => {
                return Err(PurchaseError::ReceiptMismatch {
                    item_id: order.item_id().clone(),
                });
            }
        }

        good.give(self.storage.as_ref(), 1)?;
        info!(item = %order.item_id(), product = %order.product_id(), "market purchase settled");
        Ok(self.receipt(
            order.item_id(),
            Payment::Market {
                product_id: order.product_id().to_string(),
                price: order.price(),
            },
        ))
    }

    fn receipt(&self, item_id: &ItemId, payment: Payment) -> PurchaseReceipt {
        PurchaseReceipt {
            receipt_id: ReceiptId::new(),
            item_id: item_id.clone(),
            payment,
            settled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use tradepost_goods::{
        EquippableGood, ItemDetails, LifetimeGood, SingleUseGood, SingleUsePackGood,
        VirtualCurrency,
    };
    use tradepost_storage::InMemoryStorage;

    #[derive(Default)]
    struct RecordingGateway {
        orders: RefCell<Vec<MarketOrder>>,
    }

    impl BillingGateway for RecordingGateway {
        fn launch(&self, order: &MarketOrder) -> Result<(), PurchaseError> {
            self.orders.borrow_mut().push(order.clone());
            Ok(())
        }
    }

    struct RefusingGateway;

    impl BillingGateway for RefusingGateway {
        fn launch(&self, _order: &MarketOrder) -> Result<(), PurchaseError> {
            Err(PurchaseError::Billing("store unavailable".into()))
        }
    }

    fn economy() -> Economy {
        let mut registry = ItemRegistry::new();
        registry
            .register(VirtualCurrency::new(ItemDetails::new("coin", "Coin", "")))
            .unwrap();
        registry
            .register(SingleUseGood::new(
                ItemDetails::new("sword", "Sword", ""),
                Some(PurchaseType::with_virtual_item("coin", 50)),
            ))
            .unwrap();
        let mut pack = SingleUsePackGood::new(
            ItemDetails::new("sword_pack", "10 Swords", ""),
            Some(PurchaseType::with_virtual_item("coin", 400)),
            "sword",
            10,
        )
        .unwrap();
        pack.link();
        registry.register(pack).unwrap();
        registry
            .register(LifetimeGood::new(
                ItemDetails::new("no_ads", "No Ads", ""),
                Some(PurchaseType::with_market("com.example.no_ads", 2.99)),
            ))
            .unwrap();
        registry
            .register(EquippableGood::new(
                ItemDetails::new("helmet", "Helmet", ""),
                Some(PurchaseType::with_virtual_item("coin", 120)),
            ))
            .unwrap();

        Economy::new(registry, Arc::new(InMemoryStorage::new()))
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn pack_give_and_take_move_the_referenced_balance() {
        let economy = economy();

        economy.give(&id("sword_pack"), 2).unwrap();
        assert_eq!(economy.balance(&id("sword")).unwrap(), 20);

        economy.take(&id("sword_pack"), 1).unwrap();
        assert_eq!(economy.balance(&id("sword")).unwrap(), 10);

        economy.take(&id("sword_pack"), 999).unwrap();
        assert_eq!(economy.balance(&id("sword")).unwrap(), 0);
    }

    #[test]
    fn virtual_item_purchase_debits_payer_and_credits_good() {
        let economy = economy();
        economy.give(&id("coin"), 120).unwrap();

        let outcome = economy.buy(&id("sword"), &RecordingGateway::default()).unwrap();
        match outcome {
            PurchaseOutcome::Settled(receipt) => {
                assert_eq!(receipt.item_id(), &id("sword"));
                assert_eq!(
                    receipt.payment(),
                    &Payment::VirtualItem {
                        payer_item_id: id("coin"),
                        price: 50,
                    }
                );
            }
            other => panic!("expected settled outcome, got {other:?}"),
        }

        assert_eq!(economy.balance(&id("coin")).unwrap(), 70);
        assert_eq!(economy.balance(&id("sword")).unwrap(), 1);
    }

    #[test]
    fn repeated_pack_purchases_accumulate() {
        let economy = economy();
        economy.give(&id("coin"), 1_200).unwrap();

        for _ in 0..3 {
            economy.buy(&id("sword_pack"), &RecordingGateway::default()).unwrap();
        }

        assert_eq!(economy.balance(&id("sword")).unwrap(), 30);
        assert_eq!(economy.balance(&id("coin")).unwrap(), 0);
        // The pack itself never holds a balance.
        assert_eq!(economy.storage().balance(&id("sword_pack")).unwrap(), 0);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let economy = economy();
        economy.give(&id("coin"), 49).unwrap();

        let err = economy.buy(&id("sword"), &RecordingGateway::default()).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientFunds {
                payer: id("coin"),
                price: 50,
                balance: 49,
            }
        );

        assert_eq!(economy.balance(&id("coin")).unwrap(), 49);
        assert_eq!(economy.balance(&id("sword")).unwrap(), 0);
    }

    #[test]
    fn non_purchasable_item_rejects_buy() {
        let economy = economy();

        let err = economy.buy(&id("coin"), &RecordingGateway::default()).unwrap_err();
        assert_eq!(err, PurchaseError::NotPurchasable { item_id: id("coin") });
    }

    #[test]
    fn owned_lifetime_good_rejects_buy() {
        let economy = economy();
        economy.give(&id("no_ads"), 1).unwrap();

        let err = economy.buy(&id("no_ads"), &RecordingGateway::default()).unwrap_err();
        assert_eq!(err, PurchaseError::NotPurchasable { item_id: id("no_ads") });
    }

    #[test]
    fn market_purchase_settles_on_confirmation() {
        let economy = economy();
        let gateway = RecordingGateway::default();

        let outcome = economy.buy(&id("no_ads"), &gateway).unwrap();
        let order = match outcome {
            PurchaseOutcome::Pending(order) => order,
            other => panic!("expected pending outcome, got {other:?}"),
        };
        assert_eq!(order.product_id(), "com.example.no_ads");
        assert_eq!(gateway.orders.borrow().len(), 1);
        // Nothing is credited until the confirmation arrives.
        assert_eq!(economy.balance(&id("no_ads")).unwrap(), 0);

        let receipt = economy.confirm_market_purchase(&order).unwrap();
        assert_eq!(receipt.item_id(), &id("no_ads"));
        assert_eq!(economy.balance(&id("no_ads")).unwrap(), 1);
    }

    #[test]
    fn refused_billing_leaves_no_state_change() {
        let economy = economy();

        let err = economy.buy(&id("no_ads"), &RefusingGateway).unwrap_err();
        assert_eq!(err, PurchaseError::Billing("store unavailable".into()));
        assert_eq!(economy.balance(&id("no_ads")).unwrap(), 0);
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let economy = economy();

        let forged = MarketOrder::new("no_ads", "com.example.other_product", 0.0);
        let err = economy.confirm_market_purchase(&forged).unwrap_err();
        assert_eq!(err, PurchaseError::ReceiptMismatch { item_id: id("no_ads") });
        assert_eq!(economy.balance(&id("no_ads")).unwrap(), 0);
    }

    #[test]
    fn equip_flows_through_the_typed_lookup() {
        let economy = economy();

        let err = economy.equip(&id("helmet")).unwrap_err();
        assert!(matches!(err, GoodError::NotOwned { .. }));

        economy.give(&id("helmet"), 1).unwrap();
        economy.equip(&id("helmet")).unwrap();
        assert!(economy.storage().is_equipped(&id("helmet")).unwrap());

        economy.unequip(&id("helmet")).unwrap();
        assert!(!economy.storage().is_equipped(&id("helmet")).unwrap());
    }

    #[test]
    fn equipping_a_non_equippable_item_fails_with_unexpected_kind() {
        let economy = economy();

        let err = economy.equip(&id("sword")).unwrap_err();
        assert!(matches!(
            err,
            GoodError::Catalog(tradepost_core::StoreError::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn unknown_item_surfaces_not_found() {
        let economy = economy();

        let err = economy.give(&id("ghost"), 1).unwrap_err();
        assert_eq!(
            err,
            GoodError::Catalog(tradepost_core::StoreError::not_found("ghost"))
        );
    }
}
