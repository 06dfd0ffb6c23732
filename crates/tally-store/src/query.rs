//! # Item Queries
//!
//! Matching rules behind search and the category view.
//!
//! ```text
//!   term "tech"
//!     name      ─┐
//!     category   ├─ case-insensitive substring
//!     supplier  ─┘
//!     barcode   ─── exact-case substring
//!   any hit → match
//! ```

use tally_core::Item;

/// A prepared search term.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    raw: &'a str,
    folded: String,
}

impl<'a> Search<'a> {
    pub fn new(term: &'a str) -> Self {
        Search {
            raw: term,
            folded: term.to_lowercase(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        [item.name(), item.category(), item.supplier()]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
            || item.barcode().contains(self.raw)
    }
}

/// Case-insensitive exact category comparison.
pub fn in_category(item: &Item, category: &str) -> bool {
    item.category().to_lowercase() == category.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use tally_core::{ItemParts, Money};

    fn item(name: &str, category: &str, supplier: &str, barcode: &str) -> Item {
        let stamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Item::from_parts(ItemParts {
            id: 1,
            name: name.to_string(),
            category: category.to_string(),
            supplier: supplier.to_string(),
            barcode: barcode.to_string(),
            quantity: 1,
            minimum_stock: 0,
            cost: Money::zero(),
            selling_price: Money::zero(),
            date_added: stamp,
            last_modified: stamp,
            expiry_date: None,
            location: String::new(),
            description: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_search_folds_case_on_text_fields() {
        let gadget = item("Gadget", "Electronics", "TechCorp", "555000111");
        assert!(Search::new("tech").matches(&gadget));
        assert!(Search::new("GADG").matches(&gadget));
        assert!(Search::new("electron").matches(&gadget));
        assert!(!Search::new("widget").matches(&gadget));
    }

    #[test]
    fn test_search_barcode_is_case_sensitive() {
        let coded = item("Label", "Office", "", "ab123cd45");
        assert!(Search::new("123").matches(&coded));
        assert!(Search::new("ab1").matches(&coded));
        assert!(!Search::new("AB1").matches(&coded));
    }

    #[test]
    fn test_search_ignores_location_and_description() {
        let mut shelf = item("Widget", "Tools", "", "999999999");
        shelf.set_location("Aisle tech");
        assert!(!Search::new("aisle").matches(&shelf));
    }

    #[test]
    fn test_in_category() {
        let bolt = item("Bolt", "Hardware", "", "111111111");
        assert!(in_category(&bolt, "hardware"));
        assert!(in_category(&bolt, "HARDWARE"));
        assert!(!in_category(&bolt, "hard"));
    }
}
