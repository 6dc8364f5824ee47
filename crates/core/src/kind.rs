//! Flat variant tags for virtual items.

use serde::{Deserialize, Serialize};

/// The variant of a virtual item.
///
/// Typed registry lookups report this in `StoreError::UnexpectedKind` so
/// callers match on variants explicitly instead of downcasting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Currency,
    SingleUse,
    SingleUsePack,
    Lifetime,
    Equippable,
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ItemKind::Currency => "currency",
            ItemKind::SingleUse => "single-use good",
            ItemKind::SingleUsePack => "single-use pack",
            ItemKind::Lifetime => "lifetime good",
            ItemKind::Equippable => "equippable good",
        };
        f.write_str(name)
    }
}
