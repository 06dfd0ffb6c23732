//! # tally-store: Inventory Store for Tally
//!
//! Owns the items, the id sequence and the backing file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  Menu option / subcommand (e.g. "Adjust Quantity")                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tally-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Inventory   │    │    queries    │    │  analytics   │  │   │
//! │  │   │  (store.rs)   │───►│  (query.rs)   │    │ (report)     │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐                                            │   │
//! │  │   │   DataFile    │  load on open, rewrite on every mutation   │   │
//! │  │   │   (file.rs)   │                                            │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory_data.csv (header + one record per item)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `Inventory` and its configuration
//! - [`file`] - Backing file reads and atomic writes
//! - [`query`] - Search and category matching
//! - [`analytics`] - Store-wide report
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::{Money, NewItem};
//! use tally_store::{Inventory, StoreConfig};
//!
//! let mut store = Inventory::open(StoreConfig::in_memory()).unwrap();
//! let id = store
//!     .add(NewItem::new("Widget", "Tools", 10, Money::from_cents(250)))
//!     .unwrap();
//!
//! assert_eq!(store.search("widg").len(), 1);
//! assert_eq!(store.adjust_quantity(id, -3).unwrap(), 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod file;
pub mod query;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::{AnalyticsReport, CategorySummary, TopItem};
pub use error::{StoreError, StoreResult};
pub use file::ImportSummary;
pub use store::{Inventory, StoreConfig};
