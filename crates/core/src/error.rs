//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;
use crate::kind::ItemKind;

/// Result type used across the domain layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic catalog/domain failures (lookup,
/// registration, record parsing, validation). Storage and purchase
/// fulfillment carry their own error types closer to where they happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lookup by item id found nothing.
    #[error("virtual item '{item_id}' not found")]
    ItemNotFound { item_id: ItemId },

    /// An item with the same id is already registered.
    #[error("virtual item '{item_id}' is already registered")]
    DuplicateItem { item_id: ItemId },

    /// A typed lookup found an item of a different variant.
    #[error("virtual item '{item_id}' is a {found}, expected a {expected}")]
    UnexpectedKind {
        item_id: ItemId,
        expected: ItemKind,
        found: ItemKind,
    },

    /// A structured record is missing a required field or has the wrong shape.
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// A value failed validation (e.g. zero amount, empty id).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn not_found(item_id: impl Into<ItemId>) -> Self {
        Self::ItemNotFound {
            item_id: item_id.into(),
        }
    }

    pub fn duplicate(item_id: impl Into<ItemId>) -> Self {
        Self::DuplicateItem {
            item_id: item_id.into(),
        }
    }

    pub fn unexpected_kind(item_id: impl Into<ItemId>, expected: ItemKind, found: ItemKind) -> Self {
        Self::UnexpectedKind {
            item_id: item_id.into(),
            expected,
            found,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
