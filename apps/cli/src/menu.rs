//! # Interactive Menu
//!
//! The numbered console menu over an open [`Inventory`].
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Menu Loop                                            │
//! │                                                                         │
//! │   header + stats ──► "Enter your choice (0-13)" ──► dispatch           │
//! │        ▲                                               │                │
//! │        │            store error? print it, carry on    │                │
//! │        └───────────────────────────────────────────────┘                │
//! │                                                                         │
//! │   0 or end of input ──► "Saving inventory data..." ──► return          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prompts re-ask until the answer parses. Every prompt returns `None` when
//! the input is exhausted, which unwinds the session like option 0.

use chrono::Duration;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tally_core::{now, ItemId, ItemUpdate, Money, NewItem, SECONDS_PER_DAY};
use tally_store::{Inventory, StoreError};
use tracing::debug;

use crate::render;

/// Answer to a prompt; `Ok(None)` means the input ended.
type Reply<T> = io::Result<Option<T>>;

const EXPORT_DEFAULT: &str = "inventory_export.csv";

/// Unwraps a prompt answer or ends the session on end of input.
macro_rules! answer {
    ($reply:expr) => {
        match $reply? {
            Some(value) => value,
            None => return Ok(Flow::Exit),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    store: &'a mut Inventory,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut Inventory, input: R, out: W) -> Self {
        Menu { store, input, out }
    }

    /// Runs until the user picks 0 or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;
            let choice = match self.ask("Enter your choice (0-13)", |s| parse_in_range(s, 0, 13))? {
                Some(choice) => choice,
                None => break,
            };
            debug!(choice, "Menu choice");

            writeln!(self.out)?;
            if self.dispatch(choice)? == Flow::Exit {
                break;
            }
        }

        writeln!(self.out, "\nSaving inventory data...")
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", "=".repeat(60))?;
        writeln!(self.out, "    PROFESSIONAL INVENTORY MANAGEMENT SYSTEM v2.0")?;
        writeln!(self.out, "{}", "=".repeat(60))?;
        writeln!(
            self.out,
            "Current Stats: {} items | Total Value: {} | Potential Profit: {}",
            self.store.count(),
            self.store.total_value(),
            self.store.total_profit()
        )?;
        writeln!(self.out, "{}", "-".repeat(60))?;
        for line in [
            " 1.  Add New Item (Basic)",
            " 2.  Add New Item (Comprehensive)",
            " 3.  Display All Items",
            " 4.  Update Item",
            " 5.  Delete Item",
            " 6.  Search Items",
            " 7.  Adjust Quantity",
            " 8.  Low Stock Alert",
            " 9.  View by Category",
            "10.  Analytics Report",
            "11.  Export to CSV",
            "12.  Import from CSV",
            "13.  Help",
            " 0.  Exit",
        ] {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "{}", "=".repeat(60))
    }

    fn dispatch(&mut self, choice: u32) -> io::Result<Flow> {
        match choice {
            1 => self.add_basic(),
            2 => self.add_comprehensive(),
            3 => self.display_all(),
            4 => self.update_item(),
            5 => self.delete_item(),
            6 => self.search(),
            7 => self.adjust_quantity(),
            8 => self.low_stock(),
            9 => self.view_category(),
            10 => self.analytics(),
            11 => self.export(),
            12 => self.import(),
            13 => {
                render::help(&mut self.out, self.store.data_path())?;
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Exit),
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn add_basic(&mut self) -> io::Result<Flow> {
        self.title("ADD NEW ITEM (BASIC)", 25)?;
        let name = answer!(self.ask("Enter item name", parse_text));
        let quantity = answer!(self.ask("Enter quantity", parse_count));
        let cost = answer!(self.ask("Enter cost per unit ($)", parse_amount));

        match self.store.add_basic(name.clone(), quantity, cost) {
            Ok(id) => writeln!(self.out, "Item '{name}' added successfully with ID: {id}")?,
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn add_comprehensive(&mut self) -> io::Result<Flow> {
        self.title("ADD NEW ITEM (COMPREHENSIVE)", 35)?;
        let name = answer!(self.ask("Enter item name", parse_text));
        let category = answer!(self.ask("Enter category", parse_text));
        let quantity = answer!(self.ask("Enter quantity", parse_count));
        let cost = answer!(self.ask("Enter cost per unit ($)", parse_amount));
        let selling_price = answer!(self.ask("Enter selling price ($)", parse_amount));

        writeln!(self.out, "\nOptional Fields (press Enter to skip):")?;
        let supplier = answer!(self.ask("Supplier", parse_any));
        let location = answer!(self.ask("Location", parse_any));
        let description = answer!(self.ask("Description", parse_any));
        let default_minimum = self.store.config().default_minimum_stock;
        let minimum = answer!(self.ask(
            &format!("Minimum stock level (default {default_minimum})"),
            |s| optional(s, parse_count)
        ));
        let expiry_days = answer!(self.ask("Days until expiry", |s| optional(s, parse_count)));

        let mut draft = NewItem::new(name.clone(), category, quantity, cost)
            .selling_price(selling_price)
            .supplier(supplier)
            .location(location)
            .description(description);
        draft.minimum_stock = minimum;
        if let Some(days) = expiry_days {
            let Some(expiry) = days
                .checked_mul(SECONDS_PER_DAY)
                .and_then(Duration::try_seconds)
                .and_then(|span| now().checked_add_signed(span))
            else {
                writeln!(self.out, "Expiry is too far in the future.")?;
                return Ok(Flow::Continue);
            };
            draft = draft.expiry_date(expiry);
        }

        match self.store.add(draft) {
            Ok(id) => writeln!(
                self.out,
                "Comprehensive item '{name}' added successfully with ID: {id}"
            )?,
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn display_all(&mut self) -> io::Result<Flow> {
        self.title("DISPLAY ALL ITEMS", 20)?;
        let days = self.store.config().expiring_soon_days;
        render::inventory_table(&mut self.out, self.store.items(), days, now())?;
        Ok(Flow::Continue)
    }

    fn update_item(&mut self) -> io::Result<Flow> {
        self.title("UPDATE ITEM", 15)?;
        let id = answer!(self.ask("Enter item ID to update", parse_id));
        let Some(item) = self.store.get(id) else {
            return self.failed(StoreError::not_found(id)).map(|_| Flow::Continue);
        };
        writeln!(
            self.out,
            "Current: {} | Qty: {} | Cost: {}",
            item.name(),
            item.quantity(),
            item.cost()
        )?;

        writeln!(self.out, "\nWhat would you like to update?")?;
        writeln!(self.out, "1. Name only")?;
        writeln!(self.out, "2. Quantity only")?;
        writeln!(self.out, "3. Cost only")?;
        writeln!(self.out, "4. Multiple fields")?;
        let choice = answer!(self.ask("Choose update type (1-4)", |s| parse_in_range(s, 1, 4)));

        let mut changes = ItemUpdate::default();
        match choice {
            1 => changes.name = Some(answer!(self.ask("Enter new name", parse_text))),
            2 => changes.quantity = Some(answer!(self.ask("Enter new quantity", parse_count))),
            3 => changes.cost = Some(answer!(self.ask("Enter new cost ($)", parse_amount))),
            _ => {
                if answer!(self.confirm("Update name?")) {
                    changes.name = Some(answer!(self.ask("Enter new name", parse_text)));
                }
                if answer!(self.confirm("Update quantity?")) {
                    changes.quantity = Some(answer!(self.ask("Enter new quantity", parse_count)));
                }
                if answer!(self.confirm("Update cost?")) {
                    changes.cost = Some(answer!(self.ask("Enter new cost ($)", parse_amount)));
                }
                if answer!(self.confirm("Update selling price?")) {
                    changes.selling_price =
                        Some(answer!(self.ask("Enter new selling price ($)", parse_amount)));
                }
            }
        }

        if changes.is_empty() {
            writeln!(self.out, "Nothing to update.")?;
            return Ok(Flow::Continue);
        }

        match self.store.update(id, changes) {
            Ok(outcome) => {
                for field in &outcome.applied {
                    writeln!(self.out, "Updated {field}.")?;
                }
                for rejected in &outcome.rejected {
                    writeln!(self.out, "Not updated: {rejected}")?;
                }
            }
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_item(&mut self) -> io::Result<Flow> {
        self.title("DELETE ITEM", 15)?;
        let id = answer!(self.ask("Enter item ID to delete", parse_id));
        let Some(item) = self.store.get(id) else {
            return self.failed(StoreError::not_found(id)).map(|_| Flow::Continue);
        };
        writeln!(self.out, "Item: {} ({})", item.name(), item.category())?;

        if !answer!(self.confirm("Are you sure you want to delete this item?")) {
            writeln!(self.out, "Delete operation cancelled.")?;
            return Ok(Flow::Continue);
        }

        match self.store.delete(id) {
            Ok(removed) => writeln!(self.out, "Item '{}' deleted successfully.", removed.name())?,
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        self.title("SEARCH ITEMS", 15)?;
        let term = answer!(self.ask(
            "Enter search term (name/category/supplier/barcode)",
            parse_text
        ));
        let found = self.store.search(&term);
        render::search_results(&mut self.out, &term, &found)?;
        Ok(Flow::Continue)
    }

    fn adjust_quantity(&mut self) -> io::Result<Flow> {
        self.title("ADJUST QUANTITY", 18)?;
        let id = answer!(self.ask("Enter item ID", parse_id));
        let Some(item) = self.store.get(id) else {
            return self.failed(StoreError::not_found(id)).map(|_| Flow::Continue);
        };
        writeln!(self.out, "Current quantity of '{}': {}", item.name(), item.quantity())?;

        let delta = answer!(self.ask(
            "Enter adjustment (positive to add, negative to remove)",
            parse_signed
        ));
        match self.store.adjust_quantity(id, delta) {
            Ok(quantity) => writeln!(self.out, "Quantity updated. New quantity: {quantity}")?,
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn low_stock(&mut self) -> io::Result<Flow> {
        let low = self.store.low_stock_items();
        render::low_stock(&mut self.out, &low)?;
        Ok(Flow::Continue)
    }

    fn view_category(&mut self) -> io::Result<Flow> {
        self.title("VIEW BY CATEGORY", 20)?;
        let name = answer!(self.ask("Enter category name", parse_text));
        let items = self.store.filter_by_category(&name);
        render::category(&mut self.out, &name, &items)?;
        Ok(Flow::Continue)
    }

    fn analytics(&mut self) -> io::Result<Flow> {
        render::analytics(&mut self.out, &self.store.analytics())?;
        Ok(Flow::Continue)
    }

    fn export(&mut self) -> io::Result<Flow> {
        self.title("EXPORT TO CSV", 15)?;
        let path = answer!(self.ask(
            &format!("Enter export file name (default {EXPORT_DEFAULT})"),
            parse_any
        ));
        let path = PathBuf::from(if path.is_empty() {
            EXPORT_DEFAULT
        } else {
            path.as_str()
        });

        match self.store.export_to(&path) {
            Ok(count) => writeln!(
                self.out,
                "Exported {count} item(s) to '{}'.",
                path.display()
            )?,
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    fn import(&mut self) -> io::Result<Flow> {
        self.title("IMPORT FROM CSV", 17)?;
        let path = PathBuf::from(answer!(self.ask("Enter file name to import", parse_text)));
        let clear = answer!(self.confirm("Clear existing inventory before import?"));

        match self.store.import_from(&path, clear) {
            Ok(summary) => {
                writeln!(
                    self.out,
                    "Import completed: {} item(s) imported, {} error(s).",
                    summary.imported, summary.errors
                )?;
            }
            Err(e) => self.failed(e)?,
        }
        Ok(Flow::Continue)
    }

    // =========================================================================
    // Prompts
    // =========================================================================

    fn title(&mut self, text: &str, underline: usize) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out, "{}", "-".repeat(underline))
    }

    fn failed(&mut self, error: StoreError) -> io::Result<()> {
        writeln!(self.out, "Error: {error}")
    }

    /// Asks until `parse` accepts the trimmed answer, printing its complaint
    /// each time it doesn't.
    fn ask<T>(&mut self, label: &str, parse: impl Fn(&str) -> Result<T, String>) -> Reply<T> {
        loop {
            write!(self.out, "{label}: ")?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match parse(line.trim()) {
                Ok(value) => return Ok(Some(value)),
                Err(complaint) => writeln!(self.out, "{complaint}")?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Reply<bool> {
        self.ask(&format!("{question} (y/n)"), |s| match s {
            "y" | "Y" | "yes" | "Yes" => Ok(true),
            "n" | "N" | "no" | "No" => Ok(false),
            _ => Err("Please enter 'y' for yes or 'n' for no.".to_string()),
        })
    }
}

// =============================================================================
// Answer Parsers
// =============================================================================

fn parse_text(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Input cannot be empty. Please try again.".to_string());
    }
    Ok(s.to_string())
}

fn parse_any(s: &str) -> Result<String, String> {
    Ok(s.to_string())
}

fn parse_signed(s: &str) -> Result<i64, String> {
    s.parse()
        .map_err(|_| "Invalid input. Please enter a whole number.".to_string())
}

fn parse_count(s: &str) -> Result<i64, String> {
    match parse_signed(s)? {
        n if n < 0 => Err("Invalid input. Please enter a number of at least 0.".to_string()),
        n => Ok(n),
    }
}

fn parse_id(s: &str) -> Result<ItemId, String> {
    match s.parse::<ItemId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err("Invalid input. Please enter a valid item ID.".to_string()),
    }
}

fn parse_in_range(s: &str, low: u32, high: u32) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(n) if (low..=high).contains(&n) => Ok(n),
        _ => Err(format!(
            "Invalid input. Please enter a number between {low} and {high}."
        )),
    }
}

fn parse_amount(s: &str) -> Result<Money, String> {
    let amount: Money = s.parse().map_err(|e| format!("Invalid input. {e}."))?;
    if amount.is_negative() {
        return Err("Amount cannot be negative. Please try again.".to_string());
    }
    Ok(amount)
}

/// Empty answer means "skip".
fn optional<T>(s: &str, parse: fn(&str) -> Result<T, String>) -> Result<Option<T>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    parse(s).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tally_store::StoreConfig;

    /// Runs the menu over scripted input and returns everything it printed.
    fn session(store: &mut Inventory, script: &[&str]) -> String {
        let input = Cursor::new(script.join("\n") + "\n");
        let mut out = Vec::new();
        Menu::new(store, input, &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store() -> Inventory {
        Inventory::open(StoreConfig::in_memory()).unwrap()
    }

    #[test]
    fn test_add_basic_then_exit() {
        let mut store = store();
        let out = session(&mut store, &["1", "Widget", "10", "2.50", "0"]);

        assert!(out.contains("Item 'Widget' added successfully with ID: 1"));
        assert!(out.ends_with("Saving inventory data...\n"));
        let item = store.get(1).unwrap();
        assert_eq!(item.category(), "General");
        assert_eq!(item.total_value(), Money::from_cents(2_500));
    }

    #[test]
    fn test_invalid_answers_are_asked_again() {
        let mut store = store();
        let out = session(
            &mut store,
            &["abc", "14", "1", "", "Widget", "-1", "ten", "10", "$x", "2.5", "0"],
        );

        assert!(out.contains("Please enter a number between 0 and 13."));
        assert!(out.contains("Input cannot be empty."));
        assert!(out.contains("at least 0"));
        assert!(out.contains("is not a valid amount"));
        assert_eq!(store.get(1).unwrap().quantity(), 10);
        assert_eq!(store.get(1).unwrap().cost(), Money::from_cents(250));
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut store = store();
        let out = session(&mut store, &[]);
        assert!(out.contains("Current Stats: 0 items"));
        assert!(out.contains("Saving inventory data..."));

        // mid-prompt
        let out = session(&mut store, &["1", "Widget"]);
        assert!(out.contains("Saving inventory data..."));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_comprehensive_defaults_and_expiry() {
        let mut store = store();
        session(
            &mut store,
            &[
                "2", "Milk", "Dairy", "20", "1.00", "1.50", "FarmCo", "", "", "", "10", "0",
            ],
        );

        let item = store.get(1).unwrap();
        assert_eq!(item.supplier(), "FarmCo");
        assert_eq!(item.minimum_stock(), 5);
        assert!(item.is_expiring_soon(30));
        assert!(!item.is_expired());
        assert_eq!(item.selling_price(), Money::from_cents(150));
    }

    #[test]
    fn test_add_comprehensive_zero_minimum_is_kept() {
        let mut store = store();
        session(
            &mut store,
            &["2", "Bolt", "Hardware", "0", "0.10", "0.20", "", "", "", "0", "", "0"],
        );

        let item = store.get(1).unwrap();
        assert_eq!(item.minimum_stock(), 0);
        assert_eq!(item.expiry_date(), None);
    }

    #[test]
    fn test_update_quantity_only() {
        let mut store = store();
        let id = store.add_basic("Widget", 10, Money::from_cents(250)).unwrap();

        let out = session(&mut store, &["4", "1", "2", "42", "0"]);
        assert!(out.contains("Updated quantity."));
        assert_eq!(store.get(id).unwrap().quantity(), 42);
    }

    #[test]
    fn test_update_multiple_fields() {
        let mut store = store();
        let id = store.add_basic("Widget", 10, Money::from_cents(250)).unwrap();

        session(
            &mut store,
            &["4", "1", "4", "y", "Gadget", "n", "y", "3.00", "maybe", "y", "5.00", "0"],
        );
        let item = store.get(id).unwrap();
        assert_eq!(item.name(), "Gadget");
        assert_eq!(item.quantity(), 10);
        assert_eq!(item.cost(), Money::from_cents(300));
        assert_eq!(item.selling_price(), Money::from_cents(500));
    }

    #[test]
    fn test_missing_id_reports_not_found() {
        let mut store = store();
        let out = session(&mut store, &["4", "9", "5", "9", "7", "9", "0"]);
        assert_eq!(out.matches("Error: Item with ID 9 not found").count(), 3);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut store = store();
        let id = store.add_basic("Widget", 10, Money::from_cents(250)).unwrap();

        let out = session(&mut store, &["5", "1", "n", "0"]);
        assert!(out.contains("Delete operation cancelled."));
        assert!(store.get(id).is_some());

        let out = session(&mut store, &["5", "1", "yes", "0"]);
        assert!(out.contains("Item 'Widget' deleted successfully."));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_adjust_below_zero_is_reported() {
        let mut store = store();
        let id = store.add_basic("Widget", 3, Money::from_cents(250)).unwrap();

        let out = session(&mut store, &["7", "1", "-4", "7", "1", "+2", "0"]);
        assert!(out.contains("Error:"));
        assert!(out.contains("New quantity: 5"));
        assert_eq!(store.get(id).unwrap().quantity(), 5);
    }

    #[test]
    fn test_search_and_category_views() {
        let mut store = store();
        store
            .add(NewItem::new("Gadget", "Electronics", 3, Money::from_cents(100)).supplier("TechCorp"))
            .unwrap();

        let out = session(&mut store, &["6", "tech", "9", "electronics", "8", "0"]);
        assert!(out.contains("SEARCH RESULTS for 'tech'"));
        assert!(out.contains("ITEMS IN CATEGORY: electronics"));
        assert!(out.contains("LOW STOCK ALERT"));
    }

    #[test]
    fn test_export_then_import_with_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let path_text = path.to_string_lossy().into_owned();

        let mut store = store();
        store.add_basic("Widget", 10, Money::from_cents(250)).unwrap();
        let out = session(&mut store, &["11", &path_text, "0"]);
        assert!(out.contains("Exported 1 item(s)"));

        store.add_basic("Extra", 1, Money::zero()).unwrap();
        let out = session(&mut store, &["12", &path_text, "y", "0"]);
        assert!(out.contains("1 item(s) imported, 0 error(s)"));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_import_missing_file_keeps_items() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");

        let mut store = store();
        store.add_basic("Widget", 10, Money::from_cents(250)).unwrap();
        let out = session(&mut store, &["12", &missing.to_string_lossy(), "y", "0"]);

        assert!(out.contains("Error:"));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_analytics_and_help() {
        let mut store = store();
        let out = session(&mut store, &["10", "13", "0"]);
        assert!(out.contains("No data available for analytics."));
        assert!(out.contains("HELP & INSTRUCTIONS"));
    }

    #[test]
    fn test_optional_parser() {
        assert_eq!(optional("", parse_count), Ok(None));
        assert_eq!(optional("0", parse_count), Ok(Some(0)));
        assert!(optional("-2", parse_count).is_err());
    }
}
