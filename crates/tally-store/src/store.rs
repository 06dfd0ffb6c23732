//! # Inventory Store
//!
//! The ordered item collection and every operation the CLI drives.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventory Store                                  │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← defaults for category / min stock / window   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Inventory::open(config) ← load backing file (best effort)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────┐                     │
//! │  │  items: Vec<Item>   (insertion = display order)│                    │
//! │  │  ids:   IdSequence  (never reused)             │                    │
//! │  │  file:  Option<DataFile>                       │                    │
//! │  └───────────────────────────────────────────────┘                     │
//! │       │                                                                 │
//! │       │ add / update / delete / adjust / import                        │
//! │       ▼                                                                 │
//! │  DataFile::save ← full rewrite after every successful mutation         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Inventory::close ← final write                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failed Saves
//! When a mutation succeeds but the follow-up save fails, the change stays
//! in memory, the store is marked dirty and `StoreError::Persist` is
//! returned. The next mutation, `save`, `close` or drop writes it again.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tally_core::{
    IdSequence, Item, ItemId, ItemUpdate, Money, NewItem, UpdateOutcome, ValidationError,
    DEFAULT_CATEGORY, DEFAULT_EXPIRING_SOON_DAYS, DEFAULT_MINIMUM_STOCK,
};

use crate::analytics::AnalyticsReport;
use crate::error::{StoreError, StoreResult};
use crate::file::{self, DataFile, ImportSummary};
use crate::query::{in_category, Search};

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust
/// use tally_store::StoreConfig;
///
/// let config = StoreConfig::new("inventory_data.csv")
///     .default_category("Misc")
///     .expiring_soon_days(14);
/// assert_eq!(config.default_minimum_stock, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing file. `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,

    /// Category given to items added with `add_basic`.
    /// Default: "General"
    pub default_category: String,

    /// Threshold for new items that do not specify one.
    /// Default: 5
    pub default_minimum_stock: i64,

    /// Window for "expiring soon" in status and analytics.
    /// Default: 30 days
    pub expiring_soon_days: u32,
}

impl StoreConfig {
    /// Creates a configuration backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_path: Some(path.into()),
            ..Self::in_memory()
        }
    }

    /// Creates a configuration with no backing file (tests, dry runs).
    pub fn in_memory() -> Self {
        StoreConfig {
            data_path: None,
            default_category: DEFAULT_CATEGORY.to_string(),
            default_minimum_stock: DEFAULT_MINIMUM_STOCK,
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }

    pub fn default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    pub fn default_minimum_stock(mut self, minimum: i64) -> Self {
        self.default_minimum_stock = minimum;
        self
    }

    pub fn expiring_soon_days(mut self, days: u32) -> Self {
        self.expiring_soon_days = days;
        self
    }

    fn validate(&self) -> StoreResult<()> {
        if self.default_minimum_stock < 0 {
            return Err(ValidationError::negative("default minimum stock").into());
        }
        Ok(())
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// The inventory store.
#[derive(Debug)]
pub struct Inventory {
    items: Vec<Item>,
    ids: IdSequence,
    file: Option<DataFile>,
    config: StoreConfig,
    dirty: bool,
}

impl Inventory {
    /// Opens the store, loading the backing file if there is one.
    ///
    /// A missing or unreadable file is not an error; malformed records are
    /// skipped with a warning. Fails only on an invalid configuration.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let mut ids = IdSequence::new();
        let file = config.data_path.as_ref().map(DataFile::new);
        let items = match &file {
            Some(file) => file.load(&mut ids),
            None => Vec::new(),
        };

        info!(
            items = items.len(),
            next_id = ?ids.peek().ok(),
            in_memory = file.is_none(),
            "Inventory opened"
        );

        Ok(Inventory {
            items,
            ids,
            file,
            config,
            dirty: false,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Backing file path, if the store has one.
    pub fn data_path(&self) -> Option<&Path> {
        self.file.as_ref().map(DataFile::path)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Writes the backing file now.
    pub fn save(&mut self) -> StoreResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        match file.save(&self.items) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(source) => {
                self.dirty = true;
                warn!(
                    path = %file.path().display(),
                    error = %source,
                    "Save failed, changes kept in memory"
                );
                Err(StoreError::Persist {
                    path: file.path().to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Final write, then drops the store.
    pub fn close(mut self) -> StoreResult<()> {
        info!(items = self.items.len(), "Closing inventory");
        let result = self.save();
        self.dirty = false;
        result
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds an item and returns its id.
    ///
    /// A draft without a minimum stock gets the configured default.
    pub fn add(&mut self, mut draft: NewItem) -> StoreResult<ItemId> {
        draft.minimum_stock = draft
            .minimum_stock
            .or(Some(self.config.default_minimum_stock));

        let item = Item::new(self.ids.peek()?, draft)?;
        let id = self.ids.allocate()?;

        debug!(id, name = %item.name(), "Adding item");
        self.items.push(item);
        self.save()?;
        Ok(id)
    }

    /// Adds an item in the default category with no optional fields.
    pub fn add_basic(
        &mut self,
        name: impl Into<String>,
        quantity: i64,
        cost: Money,
    ) -> StoreResult<ItemId> {
        let draft = NewItem::new(name, self.config.default_category.clone(), quantity, cost);
        self.add(draft)
    }

    /// Applies a partial update.
    ///
    /// Rejected fields are reported in the outcome; the accepted ones are
    /// kept and saved.
    pub fn update(&mut self, id: ItemId, changes: ItemUpdate) -> StoreResult<UpdateOutcome> {
        let item = self.get_mut(id)?;
        let outcome = changes.apply_to(item);

        debug!(
            id,
            applied = outcome.applied.len(),
            rejected = outcome.rejected.len(),
            "Updated item"
        );

        if outcome.changed() {
            self.save()?;
        }
        Ok(outcome)
    }

    /// Removes an item and returns it.
    pub fn delete(&mut self, id: ItemId) -> StoreResult<Item> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);

        debug!(id, name = %removed.name(), "Deleted item");
        self.save()?;
        Ok(removed)
    }

    /// Adds `delta` to an item's quantity and returns the new quantity.
    pub fn adjust_quantity(&mut self, id: ItemId, delta: i64) -> StoreResult<i64> {
        let quantity = self.get_mut(id)?.adjust_quantity(delta)?;

        debug!(id, delta, quantity, "Adjusted quantity");
        self.save()?;
        Ok(quantity)
    }

    // -------------------------------------------------------------------------
    // Lookups & Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: ItemId) -> StoreResult<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StoreError::not_found(id))
    }

    fn position(&self, id: ItemId) -> StoreResult<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(StoreError::not_found(id))
    }

    /// All items, in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items whose name, category or supplier contains `term` (any case),
    /// or whose barcode contains it exactly.
    pub fn search(&self, term: &str) -> Vec<&Item> {
        let search = Search::new(term);
        self.items.iter().filter(|item| search.matches(item)).collect()
    }

    /// Items in `category`, compared without case.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| in_category(item, category))
            .collect()
    }

    pub fn low_stock_items(&self) -> Vec<&Item> {
        self.items.iter().filter(|item| item.is_low_stock()).collect()
    }

    /// Items expiring within `days`, including those already expired.
    pub fn expiring_items(&self, days: u32) -> Vec<&Item> {
        let now = Utc::now();
        self.items
            .iter()
            .filter(|item| item.is_expiring_soon_at(days, now))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------------

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_value(&self) -> Money {
        self.items.iter().map(Item::total_value).sum()
    }

    pub fn total_profit(&self) -> Money {
        self.items.iter().map(Item::profit).sum()
    }

    pub fn total_potential_revenue(&self) -> Money {
        self.items.iter().map(Item::potential_revenue).sum()
    }

    pub fn analytics(&self) -> AnalyticsReport {
        self.analytics_at(Utc::now())
    }

    pub fn analytics_at(&self, now: DateTime<Utc>) -> AnalyticsReport {
        AnalyticsReport::build(&self.items, self.config.expiring_soon_days, now)
    }

    // -------------------------------------------------------------------------
    // Import / Export
    // -------------------------------------------------------------------------

    /// Writes every item to `path` in backing-file format and returns the
    /// number of records written. The store itself is untouched.
    pub fn export_to(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        file::write_records(path, &self.items).map_err(|e| StoreError::io(path, e))?;

        info!(path = %path.display(), count = self.items.len(), "Exported inventory");
        Ok(self.items.len())
    }

    /// Reads records from `path` into the store, optionally replacing the
    /// current items.
    ///
    /// Bad records are counted, never fatal. Imported items keep their ids;
    /// a record whose id is already present is skipped. Existing items are
    /// only cleared once the file has been opened.
    pub fn import_from(
        &mut self,
        path: impl AsRef<Path>,
        clear_existing: bool,
    ) -> StoreResult<ImportSummary> {
        let path = path.as_ref();
        let records = file::open_records(path).map_err(|e| StoreError::io(path, e))?;

        if clear_existing {
            info!(removed = self.items.len(), "Clearing inventory before import");
            self.items.clear();
        }

        let summary = file::ingest(records, path, &mut self.ids, &mut self.items);
        info!(
            path = %path.display(),
            imported = summary.imported,
            errors = summary.errors,
            "Import finished"
        );

        self.save()?;
        Ok(summary)
    }
}

impl Drop for Inventory {
    fn drop(&mut self) {
        if self.dirty {
            // save() logs its own failure
            let _ = self.save();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn widget() -> NewItem {
        NewItem::new("Widget", "Tools", 10, Money::from_cents(250))
            .selling_price(Money::from_cents(400))
    }

    fn memory() -> Inventory {
        Inventory::open(StoreConfig::in_memory()).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/inventory.csv")
            .default_category("Misc")
            .default_minimum_stock(2)
            .expiring_soon_days(7);

        assert_eq!(config.data_path, Some(PathBuf::from("/tmp/inventory.csv")));
        assert_eq!(config.default_category, "Misc");
        assert_eq!(config.default_minimum_stock, 2);
        assert_eq!(config.expiring_soon_days, 7);
    }

    #[test]
    fn test_open_rejects_negative_default_minimum() {
        let config = StoreConfig::in_memory().default_minimum_stock(-1);
        assert!(matches!(
            Inventory::open(config),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut store = memory();
        let ids: Vec<ItemId> = (0..5).map(|_| store.add(widget()).unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn test_failed_add_leaves_store_unchanged() {
        let mut store = memory();
        let err = store
            .add(NewItem::new("", "Tools", 1, Money::zero()))
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.add(widget()).unwrap(), 1);
    }

    #[test]
    fn test_add_uses_configured_defaults() {
        let config = StoreConfig::in_memory()
            .default_category("Misc")
            .default_minimum_stock(2);
        let mut store = Inventory::open(config).unwrap();

        let id = store.add_basic("Tape", 4, Money::from_cents(199)).unwrap();
        let item = store.get(id).unwrap();
        assert_eq!(item.category(), "Misc");
        assert_eq!(item.minimum_stock(), 2);

        let id = store.add(widget().minimum_stock(0)).unwrap();
        assert_eq!(store.get(id).unwrap().minimum_stock(), 0);
    }

    #[test]
    fn test_totals() {
        let mut store = memory();
        store.add(widget()).unwrap();
        assert_eq!(store.total_value().cents(), 2_500);
        assert_eq!(store.total_profit().cents(), 1_500);
        assert_eq!(store.total_potential_revenue().cents(), 4_000);
    }

    #[test]
    fn test_update_partial_success() {
        let mut store = memory();
        let id = store.add(widget()).unwrap();

        let outcome = store
            .update(
                id,
                ItemUpdate {
                    name: Some("Gadget".to_string()),
                    cost: Some(Money::from_cents(-5)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(outcome.applied, vec!["name"]);
        assert_eq!(outcome.rejected.len(), 1);
        let item = store.get(id).unwrap();
        assert_eq!(item.name(), "Gadget");
        assert_eq!(item.cost().cents(), 250);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let mut store = memory();
        assert!(matches!(
            store.update(9, ItemUpdate::default()),
            Err(StoreError::NotFound { id: 9 })
        ));
        assert!(matches!(
            store.delete(9),
            Err(StoreError::NotFound { id: 9 })
        ));
        assert!(matches!(
            store.adjust_quantity(9, 1),
            Err(StoreError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn test_delete() {
        let mut store = memory();
        let first = store.add(widget()).unwrap();
        let second = store.add(widget()).unwrap();

        let removed = store.delete(first).unwrap();
        assert_eq!(removed.id(), first);
        assert_eq!(store.count(), 1);
        assert!(store.get(first).is_none());
        assert!(store.get(second).is_some());

        assert_eq!(store.add(widget()).unwrap(), 3);
    }

    #[test]
    fn test_adjust_quantity() {
        let mut store = memory();
        let id = store.add(widget()).unwrap();

        assert_eq!(store.adjust_quantity(id, -4).unwrap(), 6);
        let err = store.adjust_quantity(id, -7).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InsufficientQuantity { .. })
        ));
        assert_eq!(store.get(id).unwrap().quantity(), 6);
    }

    #[test]
    fn test_queries_keep_store_order() {
        let mut store = memory();
        store
            .add(NewItem::new("Gadget", "Electronics", 3, Money::zero()).supplier("TechCorp"))
            .unwrap();
        store
            .add(NewItem::new("Widget", "tools", 5, Money::zero()).minimum_stock(5))
            .unwrap();
        store
            .add(NewItem::new("Hammer", "Tools", 6, Money::zero()).minimum_stock(5))
            .unwrap();

        let names = |items: Vec<&Item>| -> Vec<String> {
            items.iter().map(|i| i.name().to_string()).collect()
        };

        assert_eq!(names(store.search("tech")), vec!["Gadget"]);
        assert_eq!(names(store.filter_by_category("TOOLS")), vec!["Widget", "Hammer"]);
        assert_eq!(names(store.low_stock_items()), vec!["Gadget", "Widget"]);
    }

    #[test]
    fn test_expiring_items() {
        let mut store = memory();
        let soon = Utc::now() + chrono::Duration::days(3);
        let later = Utc::now() + chrono::Duration::days(90);
        store.add(widget().expiry_date(soon)).unwrap();
        store.add(widget().expiry_date(later)).unwrap();
        store.add(widget()).unwrap();

        let ids: Vec<ItemId> = store.expiring_items(30).iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_every_mutation_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        let mut store = Inventory::open(StoreConfig::new(&path)).unwrap();

        let id = store.add(widget()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);

        store.adjust_quantity(id, 5).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains(",15,"));

        store.delete(id).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_export_does_not_touch_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("inventory.csv");
        let export = dir.path().join("export.csv");
        let mut store = Inventory::open(StoreConfig::new(&data)).unwrap();
        store.add(widget()).unwrap();
        let before = fs::read_to_string(&data).unwrap();

        assert_eq!(store.export_to(&export).unwrap(), 1);
        assert_eq!(fs::read_to_string(&data).unwrap(), before);
        assert_eq!(fs::read_to_string(&export).unwrap(), before);
    }

    #[test]
    fn test_import_missing_file_keeps_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = memory();
        store.add(widget()).unwrap();

        let err = store
            .import_from(dir.path().join("absent.csv"), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_import_with_clear_replaces_items() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("export.csv");

        let mut source = memory();
        source.add(widget()).unwrap();
        source.add(widget()).unwrap();
        source.export_to(&export).unwrap();

        let mut target = memory();
        target.add_basic("Old", 1, Money::zero()).unwrap();
        let summary = target.import_from(&export, true).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.errors, 0);
        let ids: Vec<ItemId> = target.items().iter().map(Item::id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(target.add(widget()).unwrap(), 3);
    }

    #[test]
    fn test_import_without_clear_skips_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("export.csv");

        let mut store = memory();
        store.add(widget()).unwrap();
        store.export_to(&export).unwrap();

        let summary = store.import_from(&export, false).unwrap();
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.errors, 1);
        assert_eq!(store.count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_save_keeps_change_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let mut store = Inventory::open(StoreConfig::new(blocker.join("inventory.csv"))).unwrap();
        let err = store.add(widget()).unwrap_err();

        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(store.count(), 1);
        assert!(store.dirty);
    }
}
