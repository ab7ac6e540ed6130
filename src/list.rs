//! Shopping-list types shared by the bridge, the trip executor, and the
//! checklist engine.

use serde::Serialize;

/// One shopping-list item.
///
/// `canonical` is the navigation-facing name matched against catalog keys;
/// `display` is what the checklist and UI show. Monolingual lists carry the
/// same string in both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub canonical: String,
    pub display: String,
}

impl ShoppingItem {
    pub fn monolingual(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            canonical: name.clone(),
            display: name,
        }
    }

    pub fn bilingual(canonical: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            display: display.into(),
        }
    }
}

/// An accepted shopping list. Immutable once submitted; a fresh submission
/// starts a new generation rather than merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    pub items: Vec<ShoppingItem>,
    pub generation: u64,
}

impl ShoppingList {
    pub fn new(items: Vec<ShoppingItem>, generation: u64) -> Self {
        Self { items, generation }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display names in list order, for building the checklist.
    pub fn display_names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.display.clone()).collect()
    }
}
