//! Two-phase catalog loading with partial-failure semantics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use tradepost_core::{ItemId, ItemKind, StoreError, StoreResult};
use tradepost_goods::{
    keys, EquippableGood, Good, LifetimeGood, PurchaseType, Record, SingleUseGood,
    SingleUsePackGood, VirtualCurrency, VirtualItem,
};

use crate::registry::ItemRegistry;

/// The persisted catalog: one record list per item variant.
///
/// Mirrors the on-disk layout of store catalogs; each record is the flat
/// per-item document described in `tradepost_goods::record`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub currencies: Vec<Record>,
    #[serde(default, rename = "singleUseGoods")]
    pub single_use_goods: Vec<Record>,
    #[serde(default, rename = "goodPacks")]
    pub good_packs: Vec<Record>,
    #[serde(default, rename = "lifetimeGoods")]
    pub lifetime_goods: Vec<Record>,
    #[serde(default, rename = "equippableGoods")]
    pub equippable_goods: Vec<Record>,
}

impl CatalogDocument {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::malformed(format!("catalog JSON: {e}")))
    }

    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::malformed(format!("catalog JSON: {e}")))
    }
}

/// One item-level problem recorded during a load.
///
/// Issues never abort the load; the offending item is skipped (malformed
/// record) or degraded (unresolved reference) and the rest of the catalog
/// stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// The item the issue belongs to, when the record carried a usable id.
    pub item_id: Option<ItemId>,
    pub error: StoreError,
}

impl core::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.item_id {
            Some(id) => write!(f, "{id}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Result of a catalog load: the registry plus every recorded issue.
#[derive(Debug)]
pub struct CatalogLoad {
    pub registry: ItemRegistry,
    pub issues: Vec<LoadIssue>,
}

/// Builds a registry from a catalog document in two phases.
///
/// Phase 1 constructs every item from its record; a malformed record is
/// logged, recorded as an issue, and skipped. Phase 2 resolves
/// cross-references (pack → good, purchase-type payer → item); an
/// unresolvable reference degrades the referencing item rather than
/// failing the load.
///
/// The only fatal condition is a duplicate item id, which aborts the whole
/// load with `StoreError::DuplicateItem`.
pub fn load_catalog(document: &CatalogDocument) -> StoreResult<CatalogLoad> {
    let mut issues = Vec::new();
    let mut items = Vec::new();

    parse_section(&document.currencies, "currencies", &mut items, &mut issues, |r| {
        VirtualCurrency::from_record(r).map(VirtualItem::from)
    });
    parse_section(&document.single_use_goods, "singleUseGoods", &mut items, &mut issues, |r| {
        SingleUseGood::from_record(r).map(VirtualItem::from)
    });
    parse_section(&document.good_packs, "goodPacks", &mut items, &mut issues, |r| {
        SingleUsePackGood::from_record(r).map(VirtualItem::from)
    });
    parse_section(&document.lifetime_goods, "lifetimeGoods", &mut items, &mut issues, |r| {
        LifetimeGood::from_record(r).map(VirtualItem::from)
    });
    parse_section(&document.equippable_goods, "equippableGoods", &mut items, &mut issues, |r| {
        EquippableGood::from_record(r).map(VirtualItem::from)
    });

    let mut kinds: HashMap<ItemId, ItemKind> = HashMap::new();
    for item in &items {
        if kinds.insert(item.id().clone(), item.kind()).is_some() {
            return Err(StoreError::duplicate(item.id().clone()));
        }
    }

    resolve_references(&mut items, &kinds, &mut issues);

    let mut registry = ItemRegistry::new();
    for item in items {
        registry.register(item)?;
    }

    Ok(CatalogLoad { registry, issues })
}

fn parse_section(
    records: &[Record],
    section: &'static str,
    items: &mut Vec<VirtualItem>,
    issues: &mut Vec<LoadIssue>,
    parse: impl Fn(&Record) -> StoreResult<VirtualItem>,
) {
    for record in records {
        match parse(record) {
            Ok(item) => items.push(item),
            Err(error) => {
                let item_id = record
                    .get(keys::ITEM_ID)
                    .and_then(|v| v.as_str())
                    .map(ItemId::from);
                warn!(section, item_id = ?item_id, %error, "skipping malformed catalog record");
                issues.push(LoadIssue { item_id, error });
            }
        }
    }
}

fn resolve_references(
    items: &mut [VirtualItem],
    kinds: &HashMap<ItemId, ItemKind>,
    issues: &mut Vec<LoadIssue>,
) {
    for item in items.iter_mut() {
        if let VirtualItem::SingleUsePack(pack) = item {
            match kinds.get(pack.good_item_id()) {
                Some(ItemKind::SingleUse) => pack.link(),
                Some(found) => {
                    let error = StoreError::unexpected_kind(
                        pack.good_item_id().clone(),
                        ItemKind::SingleUse,
                        *found,
                    );
                    warn!(pack = %pack.details().id(), %error, "pack left unlinked");
                    issues.push(LoadIssue {
                        item_id: Some(pack.details().id().clone()),
                        error,
                    });
                }
                None => {
                    let error = StoreError::not_found(pack.good_item_id().clone());
                    warn!(pack = %pack.details().id(), %error, "pack left unlinked");
                    issues.push(LoadIssue {
                        item_id: Some(pack.details().id().clone()),
                        error,
                    });
                }
            }
        }

        let payer = match item.purchase_type() {
            Some(PurchaseType::VirtualItem(price)) => Some(price.payer_item_id.clone()),
            _ => None,
        };
        if let Some(payer) = payer {
            let payer_is_counted = matches!(
                kinds.get(&payer),
                Some(ItemKind::Currency | ItemKind::SingleUse)
            );
            if !payer_is_counted {
                let error = match kinds.get(&payer) {
                    Some(_) => StoreError::validation(format!(
                        "payer '{payer}' must be a currency or single-use good"
                    )),
                    None => StoreError::not_found(payer.clone()),
                };
                warn!(item = %item.id(), %error, "item degraded to non-purchasable");
                issues.push(LoadIssue {
                    item_id: Some(item.id().clone()),
                    error,
                });
                item.remove_purchase();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "currencies": [
            { "itemId": "coin", "name": "Coin", "description": "Common currency" }
        ],
        "singleUseGoods": [
            {
                "itemId": "sword", "name": "Sword", "description": "A blade",
                "purchaseType": "virtualItem", "payerItemId": "coin", "price": 50
            }
        ],
        "goodPacks": [
            {
                "itemId": "sword_pack", "name": "10 Swords", "description": "Bulk blades",
                "goodItemId": "sword", "goodAmount": 10,
                "purchaseType": "market", "marketProductId": "com.example.sword_pack", "marketPrice": 0.99
            }
        ],
        "lifetimeGoods": [
            { "itemId": "no_ads", "name": "No Ads", "description": "",
              "purchaseType": "market", "marketProductId": "com.example.no_ads", "marketPrice": 2.99 }
        ],
        "equippableGoods": [
            { "itemId": "helmet", "name": "Helmet", "description": "",
              "purchaseType": "virtualItem", "payerItemId": "coin", "price": 120 }
        ]
    }"#;

    #[test]
    fn full_catalog_loads_without_issues() {
        let document = CatalogDocument::from_json(CATALOG).unwrap();
        let load = load_catalog(&document).unwrap();

        assert!(load.issues.is_empty(), "unexpected issues: {:?}", load.issues);
        assert_eq!(load.registry.len(), 5);

        let pack = load.registry.pack(&ItemId::from("sword_pack")).unwrap();
        assert!(pack.is_linked());
        assert_eq!(pack.good_amount(), 10);
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let mut document = CatalogDocument::from_json(CATALOG).unwrap();
        let mut broken = Record::new();
        broken.insert("itemId".into(), "nameless".into());
        document.single_use_goods.push(broken);

        let load = load_catalog(&document).unwrap();
        assert_eq!(load.issues.len(), 1);
        assert_eq!(load.issues[0].item_id, Some(ItemId::from("nameless")));
        assert!(matches!(load.issues[0].error, StoreError::MalformedRecord { .. }));
        assert!(!load.registry.contains(&ItemId::from("nameless")));
        // The rest of the catalog is intact.
        assert_eq!(load.registry.len(), 5);
    }

    #[test]
    fn duplicate_item_id_aborts_the_load() {
        let mut document = CatalogDocument::from_json(CATALOG).unwrap();
        let duplicate = document.currencies[0].clone();
        document.currencies.push(duplicate);

        let err = load_catalog(&document).unwrap_err();
        assert_eq!(err, StoreError::duplicate("coin"));
    }

    #[test]
    fn pack_with_missing_target_is_degraded_not_fatal() {
        let document = CatalogDocument::from_json(
            r#"{
                "goodPacks": [
                    { "itemId": "ghost_pack", "name": "Ghost Pack", "description": "",
                      "goodItemId": "no_such_good", "goodAmount": 5 }
                ]
            }"#,
        )
        .unwrap();

        let load = load_catalog(&document).unwrap();
        assert_eq!(load.issues.len(), 1);
        assert_eq!(load.issues[0].error, StoreError::not_found("no_such_good"));

        let pack = load.registry.pack(&ItemId::from("ghost_pack")).unwrap();
        assert!(!pack.is_linked());
    }

    #[test]
    fn pack_referencing_wrong_variant_is_degraded() {
        let document = CatalogDocument::from_json(
            r#"{
                "currencies": [
                    { "itemId": "coin", "name": "Coin", "description": "" }
                ],
                "goodPacks": [
                    { "itemId": "coin_pack", "name": "Coin Pack", "description": "",
                      "goodItemId": "coin", "goodAmount": 100 }
                ]
            }"#,
        )
        .unwrap();

        let load = load_catalog(&document).unwrap();
        assert_eq!(load.issues.len(), 1);
        assert!(matches!(load.issues[0].error, StoreError::UnexpectedKind { .. }));
        assert!(!load.registry.pack(&ItemId::from("coin_pack")).unwrap().is_linked());
    }

    #[test]
    fn unresolvable_payer_strips_the_purchase_type() {
        let document = CatalogDocument::from_json(
            r#"{
                "singleUseGoods": [
                    { "itemId": "sword", "name": "Sword", "description": "",
                      "purchaseType": "virtualItem", "payerItemId": "gem", "price": 5 }
                ]
            }"#,
        )
        .unwrap();

        let load = load_catalog(&document).unwrap();
        assert_eq!(load.issues.len(), 1);
        assert_eq!(load.issues[0].error, StoreError::not_found("gem"));

        let sword = load.registry.single_use(&ItemId::from("sword")).unwrap();
        assert!(sword.purchase_type().is_none());
    }

    #[test]
    fn loaded_items_serialize_back_to_their_records() {
        let document = CatalogDocument::from_json(CATALOG).unwrap();
        let load = load_catalog(&document).unwrap();

        let sword = load.registry.get(&ItemId::from("sword")).unwrap();
        assert_eq!(&sword.to_record(), &document.single_use_goods[0]);

        let pack = load.registry.get(&ItemId::from("sword_pack")).unwrap();
        assert_eq!(&pack.to_record(), &document.good_packs[0]);
    }

    #[test]
    fn document_json_round_trips() {
        let document = CatalogDocument::from_json(CATALOG).unwrap();
        let json = document.to_json().unwrap();
        assert_eq!(CatalogDocument::from_json(&json).unwrap(), document);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a catalog of well-formed single-use records loads
            /// completely and round-trips every item's metadata.
            #[test]
            fn well_formed_catalogs_load_losslessly(
                names in proptest::collection::vec("[A-Za-z][A-Za-z0-9 ]{0,24}", 1..12),
            ) {
                let mut document = CatalogDocument::default();
                for (i, name) in names.iter().enumerate() {
                    let mut record = Record::new();
                    record.insert("itemId".into(), format!("item_{i}").into());
                    record.insert("name".into(), name.as_str().into());
                    record.insert("description".into(), "".into());
                    document.single_use_goods.push(record);
                }

                let load = load_catalog(&document).unwrap();
                prop_assert!(load.issues.is_empty());
                prop_assert_eq!(load.registry.len(), names.len());

                for (i, name) in names.iter().enumerate() {
                    let id = ItemId::new(format!("item_{i}"));
                    let good = load.registry.single_use(&id).unwrap();
                    prop_assert_eq!(good.details().name(), name.as_str());
                }
            }
        }
    }
}
