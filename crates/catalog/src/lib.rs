//! `tradepost-catalog` — catalog loading, item resolution, and the economy
//! context.
//!
//! Catalog bytes come in as a [`CatalogDocument`], pass through the
//! two-phase [`load_catalog`] (construct, then resolve cross-references),
//! and end up in an [`ItemRegistry`]. An [`Economy`] ties the registry to a
//! balance storage and exposes the give/take/buy surface.

pub mod economy;
pub mod loader;
pub mod registry;

pub use economy::{
    BillingGateway, Economy, MarketOrder, Payment, PurchaseError, PurchaseOutcome, PurchaseReceipt,
};
pub use loader::{load_catalog, CatalogDocument, CatalogLoad, LoadIssue};
pub use registry::ItemRegistry;
