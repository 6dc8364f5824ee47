//! `tradepost-goods` — virtual items, good variants, and purchase types.
//!
//! This crate contains the economy's item model, implemented purely as
//! deterministic domain logic. The only side effects are balance mutations
//! delegated to a [`tradepost_storage::GoodsStorage`].

pub mod currency;
pub mod equippable;
pub mod good;
pub mod item;
pub mod lifetime;
pub mod pack;
pub mod purchase;
pub mod record;
pub mod single_use;

pub use currency::VirtualCurrency;
pub use equippable::EquippableGood;
pub use good::{Good, GoodError};
pub use item::{ItemDetails, VirtualItem};
pub use lifetime::LifetimeGood;
pub use pack::SingleUsePackGood;
pub use purchase::{MarketProduct, PurchaseType, VirtualItemPrice};
pub use record::{keys, Record};
pub use single_use::SingleUseGood;
