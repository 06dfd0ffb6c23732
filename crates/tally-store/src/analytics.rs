//! # Analytics Report
//!
//! Store-wide figures computed in one pass over the items.
//!
//! ## Report Contents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INVENTORY ANALYTICS REPORT                                            │
//! │                                                                         │
//! │  Totals        items, value (qty × cost), profit, potential revenue    │
//! │  Categories    exact category string → count, value   (sorted)         │
//! │  Stock status  low stock / expiring soon / expired counts              │
//! │  Top items     5 highest total value, ties keep store order            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report is plain data so the CLI can print it as a table or as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use tally_core::{Item, ItemId, Money};

/// How many items the top-value list holds.
pub const TOP_ITEM_COUNT: usize = 5;

/// Count and value for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub value: Money,
}

/// One entry of the top-value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub id: ItemId,
    pub name: String,
    pub total_value: Money,
}

/// Store-wide analytics.
///
/// `expiring_soon` includes items that have already expired, matching
/// [`Item::is_expiring_soon`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub total_items: usize,
    pub total_value: Money,
    pub total_profit: Money,
    pub potential_revenue: Money,
    pub categories: Vec<CategorySummary>,
    pub low_stock: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub expiring_soon_days: u32,
    pub top_items: Vec<TopItem>,
}

impl AnalyticsReport {
    /// Computes the report for `items` as of `now`.
    pub fn build(items: &[Item], expiring_soon_days: u32, now: DateTime<Utc>) -> Self {
        let mut categories: BTreeMap<&str, (usize, Money)> = BTreeMap::new();
        for item in items {
            let entry = categories.entry(item.category()).or_default();
            entry.0 += 1;
            entry.1 += item.total_value();
        }

        let mut ranked: Vec<&Item> = items.iter().collect();
        ranked.sort_by(|a, b| b.total_value().cmp(&a.total_value()));

        AnalyticsReport {
            total_items: items.len(),
            total_value: items.iter().map(Item::total_value).sum(),
            total_profit: items.iter().map(Item::profit).sum(),
            potential_revenue: items.iter().map(Item::potential_revenue).sum(),
            categories: categories
                .into_iter()
                .map(|(category, (count, value))| CategorySummary {
                    category: category.to_string(),
                    count,
                    value,
                })
                .collect(),
            low_stock: items.iter().filter(|i| i.is_low_stock()).count(),
            expiring_soon: items
                .iter()
                .filter(|i| i.is_expiring_soon_at(expiring_soon_days, now))
                .count(),
            expired: items.iter().filter(|i| i.is_expired_at(now)).count(),
            expiring_soon_days,
            top_items: ranked
                .into_iter()
                .take(TOP_ITEM_COUNT)
                .map(|item| TopItem {
                    id: item.id(),
                    name: item.name().to_string(),
                    total_value: item.total_value(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::ItemParts;

    const NOW: i64 = 1_700_000_000;

    fn item(id: ItemId, category: &str, qty: i64, cost: i64, expiry: Option<i64>) -> Item {
        let stamp = DateTime::from_timestamp(NOW - 1_000, 0).unwrap();
        Item::from_parts(ItemParts {
            id,
            name: format!("Item {id}"),
            category: category.to_string(),
            supplier: String::new(),
            barcode: "100000000".to_string(),
            quantity: qty,
            minimum_stock: 5,
            cost: Money::from_cents(cost),
            selling_price: Money::from_cents(cost * 2),
            date_added: stamp,
            last_modified: stamp,
            expiry_date: expiry.map(|s| DateTime::from_timestamp(s, 0).unwrap()),
            location: String::new(),
            description: String::new(),
        })
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = AnalyticsReport::build(&[], 30, now());
        assert!(report.is_empty());
        assert!(report.categories.is_empty());
        assert!(report.top_items.is_empty());
        assert_eq!(report.total_value, Money::zero());
    }

    #[test]
    fn test_totals_and_categories() {
        let items = vec![
            item(1, "Tools", 10, 250, None),
            item(2, "Dairy", 20, 100, None),
            item(3, "Tools", 6, 1_000, None),
            item(4, "tools", 7, 100, None),
        ];
        let report = AnalyticsReport::build(&items, 30, now());

        assert_eq!(report.total_items, 4);
        assert_eq!(report.total_value.cents(), 2_500 + 2_000 + 6_000 + 700);
        assert_eq!(report.total_profit, report.total_value);
        assert_eq!(report.potential_revenue.cents(), 2 * 11_200);

        let names: Vec<&str> = report
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Dairy", "Tools", "tools"]);
        assert_eq!(report.categories[1].count, 2);
        assert_eq!(report.categories[1].value.cents(), 8_500);
    }

    #[test]
    fn test_status_counts() {
        let day = tally_core::SECONDS_PER_DAY;
        let items = vec![
            item(1, "A", 2, 100, None),
            item(2, "A", 50, 100, Some(NOW - day)),
            item(3, "A", 50, 100, Some(NOW + 3 * day)),
            item(4, "A", 50, 100, Some(NOW + 90 * day)),
        ];
        let report = AnalyticsReport::build(&items, 30, now());

        assert_eq!(report.low_stock, 1);
        assert_eq!(report.expired, 1);
        assert_eq!(report.expiring_soon, 2);
    }

    #[test]
    fn test_top_items_order_and_ties() {
        let items = vec![
            item(1, "A", 1, 100, None),
            item(2, "A", 1, 500, None),
            item(3, "A", 1, 300, None),
            item(4, "A", 1, 500, None),
            item(5, "A", 1, 200, None),
            item(6, "A", 1, 400, None),
        ];
        let report = AnalyticsReport::build(&items, 30, now());

        let ids: Vec<ItemId> = report.top_items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 6, 3, 5]);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = AnalyticsReport::build(&[item(1, "Tools", 10, 250, None)], 30, now());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_items"], 1);
        assert_eq!(json["total_value"], 2_500);
        assert_eq!(json["categories"][0]["category"], "Tools");
    }
}
