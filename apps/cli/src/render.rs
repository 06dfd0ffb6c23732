//! # Terminal Rendering
//!
//! Plain-text views of the inventory for the menu and the subcommands.
//!
//! ## Table Layout
//! ```text
//! ID  NAME                CATEGORY    QTY     MIN     COST      SELL      VALUE       PROFIT      SUPPLIER       LOCATION    STATUS
//! ────────────────────────────────────────────────────────────────────────────────────────────────────────────────────────────────
//! 1   Widget              Tools       10      5       $2.50     $4.00     $25.00      $15.00      TechCorp       Shelf A     OK
//! 2   Extra long item ... Hardware    3       5       $0.15     $0.40     $0.45       $0.75                                  LOW
//! ```
//!
//! Every function writes to a `Write` so the menu tests can capture output.

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use tally_core::{Item, Money};
use tally_store::AnalyticsReport;

/// Column widths, in order: ID, NAME, CATEGORY, QTY, MIN, COST, SELL,
/// VALUE, PROFIT, SUPPLIER, LOCATION.
const WIDTHS: [usize; 11] = [4, 20, 12, 8, 8, 10, 10, 12, 12, 15, 12];

const TABLE_RULE: usize = 140;

/// Shortens `text` to at most `max` characters, ending in "..." when cut.
pub fn fit(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    Cow::Owned(format!("{kept}..."))
}

fn rule(out: &mut impl Write, ch: char, width: usize) -> io::Result<()> {
    writeln!(out, "{}", ch.to_string().repeat(width))
}

// =============================================================================
// Inventory Table
// =============================================================================

/// The full inventory table followed by its summary line.
pub fn inventory_table(
    out: &mut impl Write,
    items: &[Item],
    expiring_soon_days: u32,
    now: DateTime<Utc>,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "\nNo items found in the inventory.");
    }

    writeln!(out, "\nCOMPREHENSIVE INVENTORY REPORT")?;
    rule(out, '=', TABLE_RULE)?;
    let headers = [
        "ID", "NAME", "CATEGORY", "QTY", "MIN", "COST", "SELL", "VALUE", "PROFIT", "SUPPLIER",
        "LOCATION",
    ];
    for (header, width) in headers.iter().zip(WIDTHS) {
        write!(out, "{header:<width$}")?;
    }
    writeln!(out, "STATUS")?;
    rule(out, '-', TABLE_RULE)?;

    for item in items {
        let cells = [
            Cow::Owned(item.id().to_string()),
            fit(item.name(), WIDTHS[1] - 1),
            fit(item.category(), WIDTHS[2] - 1),
            Cow::Owned(item.quantity().to_string()),
            Cow::Owned(item.minimum_stock().to_string()),
            Cow::Owned(item.cost().to_string()),
            Cow::Owned(item.selling_price().to_string()),
            Cow::Owned(item.total_value().to_string()),
            Cow::Owned(item.profit().to_string()),
            fit(item.supplier(), WIDTHS[9] - 1),
            fit(item.location(), WIDTHS[10] - 1),
        ];
        for (cell, width) in cells.iter().zip(WIDTHS) {
            write!(out, "{cell:<width$}")?;
        }
        writeln!(out, "{}", item.stock_status_at(expiring_soon_days, now))?;
    }

    rule(out, '-', TABLE_RULE)?;
    let value: Money = items.iter().map(Item::total_value).sum();
    let profit: Money = items.iter().map(Item::profit).sum();
    let low = items.iter().filter(|i| i.is_low_stock()).count();
    writeln!(
        out,
        "SUMMARY: {} items | Value: {} | Potential Profit: {} | Low Stock Items: {}\n",
        items.len(),
        value,
        profit,
        low
    )
}

// =============================================================================
// Listings
// =============================================================================

pub fn search_results(out: &mut impl Write, term: &str, items: &[&Item]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No items found matching '{term}'");
    }

    writeln!(out, "\nSEARCH RESULTS for '{term}'")?;
    rule(out, '=', 100)?;
    for item in items {
        writeln!(
            out,
            "ID: {} | Name: {} | Category: {} | Supplier: {} | Barcode: {}",
            item.id(),
            item.name(),
            item.category(),
            item.supplier(),
            item.barcode()
        )?;
        writeln!(
            out,
            "    Qty: {} | Cost: {} | Sell: {} | Value: {} | Location: {}\n",
            item.quantity(),
            item.cost(),
            item.selling_price(),
            item.total_value(),
            item.location()
        )?;
    }
    writeln!(out, "Found {} matching item(s)\n", items.len())
}

pub fn low_stock(out: &mut impl Write, items: &[&Item]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No items with low stock detected.");
    }

    writeln!(out, "\nLOW STOCK ALERT")?;
    rule(out, '=', 80)?;
    for item in items {
        writeln!(
            out,
            "CRITICAL - ID: {} | Name: {} | Category: {}",
            item.id(),
            item.name(),
            item.category()
        )?;
        writeln!(
            out,
            "    Current: {} | Minimum: {} | Supplier: {} | Location: {}\n",
            item.quantity(),
            item.minimum_stock(),
            item.supplier(),
            item.location()
        )?;
    }
    writeln!(out, "{} item(s) need immediate restocking\n", items.len())
}

pub fn category(out: &mut impl Write, name: &str, items: &[&Item]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No items found in category '{name}'");
    }

    writeln!(out, "\nITEMS IN CATEGORY: {name}")?;
    rule(out, '=', 60)?;
    for item in items {
        writeln!(
            out,
            "ID: {} | Name: {} | Qty: {} | Cost: {} | Value: {}",
            item.id(),
            item.name(),
            item.quantity(),
            item.cost(),
            item.total_value()
        )?;
    }
    writeln!(out, "\nFound {} item(s) in this category\n", items.len())
}

// =============================================================================
// Analytics
// =============================================================================

pub fn analytics(out: &mut impl Write, report: &AnalyticsReport) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "No data available for analytics.");
    }

    writeln!(out, "\nINVENTORY ANALYTICS REPORT")?;
    rule(out, '=', 50)?;
    writeln!(out, "Total Items: {}", report.total_items)?;
    writeln!(out, "Total Inventory Value: {}", report.total_value)?;
    writeln!(out, "Total Potential Profit: {}", report.total_profit)?;
    writeln!(out, "Potential Revenue: {}", report.potential_revenue)?;

    writeln!(out, "\nCATEGORY BREAKDOWN:")?;
    for summary in &report.categories {
        writeln!(
            out,
            "  {}: {} items, {} value",
            summary.category, summary.count, summary.value
        )?;
    }

    writeln!(out, "\nSTOCK STATUS:")?;
    writeln!(out, "  Low Stock Items: {}", report.low_stock)?;
    writeln!(
        out,
        "  Expiring Soon ({} days): {}",
        report.expiring_soon_days, report.expiring_soon
    )?;
    writeln!(out, "  Expired Items: {}", report.expired)?;

    writeln!(out, "\nTOP {} HIGHEST VALUE ITEMS:", report.top_items.len())?;
    for (rank, top) in report.top_items.iter().enumerate() {
        writeln!(out, "  {}. {} - {}", rank + 1, top.name, top.total_value)?;
    }
    writeln!(out)
}

// =============================================================================
// Help
// =============================================================================

pub fn help(out: &mut impl Write, data_file: Option<&Path>) -> io::Result<()> {
    writeln!(out, "HELP & INSTRUCTIONS")?;
    rule(out, '=', 35)?;
    writeln!(out, "BASIC OPERATIONS:")?;
    writeln!(out, "- Add Item (Basic): Quick item entry with name, quantity, cost")?;
    writeln!(out, "- Add Item (Comprehensive): Full entry with all fields")?;
    writeln!(out, "- Display Items: View all items in table format")?;
    writeln!(out, "- Update Item: Modify existing item details")?;
    writeln!(out, "- Delete Item: Remove items from inventory")?;
    writeln!(out, "- Search: Find items by name, category, supplier, or barcode")?;
    writeln!(out, "- Adjust Quantity: Add or remove stock quantities")?;
    writeln!(out, "\nADVANCED FEATURES:")?;
    writeln!(out, "- Low Stock Alert: Items at or below their minimum stock level")?;
    writeln!(out, "- View by Category: Filter items by category")?;
    writeln!(out, "- Analytics Report: Totals, categories, stock status, top items")?;
    writeln!(out, "- Export to CSV: Full export for external analysis")?;
    writeln!(out, "- Import from CSV: Bulk import; bad lines are skipped and counted")?;
    writeln!(out, "\nTIPS:")?;
    match data_file {
        Some(path) => writeln!(out, "- Data auto-saves to '{}'", path.display())?,
        None => writeln!(out, "- Running in memory: nothing is saved")?,
    }
    writeln!(out, "- Press Enter at 'minimum stock' to use the default")?;
    writeln!(out, "- Set RUST_LOG=debug to see what the store is doing")
}
