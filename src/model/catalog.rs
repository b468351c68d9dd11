//! The pricing catalog: an ordered, read-only list of items and unit prices.
//!
//! Items are addressed by their 1-based position. Item id `"1"` is the first entry,
//! `"5"` the fifth (zero-based index 4).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::Display;
use thiserror::Error;

/// Name of a catalog item.
///
/// Only a [`PricingCatalog`] hands these out, so holding one means the name was in the
/// catalog when it was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemName(String);

impl ItemName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Raw catalog entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Decimal,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub name: ItemName,
    pub price: Decimal,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The item id is not a positive integer.
    #[error("Invalid item id: {0:?}")]
    InvalidItemId(String),

    /// The item id is past the end of the catalog.
    #[error("Item id {id} is out of range (catalog has {len} items)")]
    OutOfRange { id: usize, len: usize },

    #[error("Catalog has no items")]
    Empty,

    #[error("Duplicate catalog item: {0}")]
    DuplicateItem(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingCatalog {
    items: Vec<CatalogItem>,
}

impl PricingCatalog {
    /// Builds a catalog, keeping entry order. Names must be unique and non-empty.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.name.trim().to_string();
            if name.is_empty() || !seen.insert(name.clone()) {
                return Err(CatalogError::DuplicateItem(name));
            }
            items.push(CatalogItem {
                name: ItemName(name),
                price: entry.price,
            });
        }
        Ok(Self { items })
    }

    /// The laundry price list the service ships with.
    pub fn laundry() -> Self {
        Self {
            items: default_entries()
                .into_iter()
                .map(|e| CatalogItem {
                    name: ItemName(e.name),
                    price: e.price,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolves a 1-based item id.
    pub fn item(&self, item_id: &str) -> Result<&CatalogItem, CatalogError> {
        let id: usize = item_id
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidItemId(item_id.to_string()))?;
        match id.checked_sub(1).and_then(|index| self.items.get(index)) {
            Some(item) => Ok(item),
            None => Err(CatalogError::OutOfRange {
                id,
                len: self.items.len(),
            }),
        }
    }

    /// Looks an item up by exact name.
    pub fn by_name(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }

    pub fn contains(&self, name: &ItemName) -> bool {
        self.by_name(name.as_str()).is_some()
    }

    /// Items paired with their 1-based id, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CatalogItem)> {
        self.items.iter().enumerate().map(|(i, item)| (i + 1, item))
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::laundry()
    }
}

pub fn default_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Trouser", Decimal::new(20000, 2)),
        CatalogEntry::new("Native (Men)", Decimal::new(50000, 2)),
        CatalogEntry::new("Native (Women)", Decimal::new(50000, 2)),
        CatalogEntry::new("Suit", Decimal::new(150000, 2)),
        CatalogEntry::new("Shirt", Decimal::new(15000, 2)),
        CatalogEntry::new("Bedsheet", Decimal::new(30000, 2)),
        CatalogEntry::new("Duvet", Decimal::new(100000, 2)),
        CatalogEntry::new("Towel", Decimal::new(10000, 2)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_one_based() {
        let catalog = PricingCatalog::laundry();
        assert_eq!(catalog.item("1").unwrap().name.as_str(), "Trouser");
        assert_eq!(catalog.item("5").unwrap().name.as_str(), "Shirt");
        assert_eq!(catalog.item(" 2 ").unwrap().name.as_str(), "Native (Men)");
    }

    #[test]
    fn test_out_of_range_ids_fail() {
        let catalog = PricingCatalog::laundry();
        assert_eq!(
            catalog.item("0"),
            Err(CatalogError::OutOfRange { id: 0, len: 8 })
        );
        assert_eq!(
            catalog.item("9"),
            Err(CatalogError::OutOfRange { id: 9, len: 8 })
        );
        assert!(matches!(
            catalog.item("two"),
            Err(CatalogError::InvalidItemId(_))
        ));
        assert!(matches!(
            catalog.item("-1"),
            Err(CatalogError::InvalidItemId(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_entries() {
        assert_eq!(PricingCatalog::new(vec![]), Err(CatalogError::Empty));
        let dup = PricingCatalog::new(vec![
            CatalogEntry::new("Shirt", Decimal::ONE),
            CatalogEntry::new("Shirt", Decimal::TWO),
        ]);
        assert_eq!(dup, Err(CatalogError::DuplicateItem("Shirt".into())));
    }

    #[test]
    fn test_iter_numbers_items() {
        let catalog = PricingCatalog::new(vec![
            CatalogEntry::new("wash", Decimal::new(15000, 2)),
            CatalogEntry::new("iron", Decimal::new(5000, 2)),
        ])
        .unwrap();
        let listed: Vec<(usize, &str)> = catalog.iter().map(|(i, it)| (i, it.name.as_str())).collect();
        assert_eq!(listed, vec![(1, "wash"), (2, "iron")]);
        assert!(catalog.contains(&catalog.item("2").unwrap().name));
    }
}
