//! `tradepost-storage` — balance storage consumed by the goods domain.
//!
//! The domain layer calls into storage for every balance mutation but does
//! not own persistence. Durable backends implement [`GoodsStorage`];
//! [`InMemoryStorage`] is the reference implementation.

pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryStorage;
pub use store::{GoodsStorage, StorageError};
