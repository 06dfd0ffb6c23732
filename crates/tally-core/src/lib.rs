//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains the inventory entity,
//! its validation rules and the delimited text codec, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-cli (Menu + Tables)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                tally-store (Inventory + backing file)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   codec   │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │  encode   │  │   rules   │  │   │
//! │  │   │  NewItem  │  │  parsing  │  │  decode   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO FILES • NO NETWORK • NO GLOBAL STATE                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The `Item` entity, drafts, partial updates, stock status
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`codec`] - One item per delimited text line, CSV-style quoting
//! - [`sequence`] - Id allocation owned by whoever owns the items
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{codec, IdSequence, Item, Money, NewItem};
//!
//! let mut ids = IdSequence::new();
//! let draft = NewItem::new("Widget", "Tools", 10, Money::from_cents(250))
//!     .selling_price(Money::from_cents(400));
//! let item = Item::new(ids.allocate().unwrap(), draft).unwrap();
//!
//! assert_eq!(item.total_value().cents(), 2500);
//! assert_eq!(item.profit().cents(), 1500);
//!
//! let line = codec::encode(&item);
//! let decoded = codec::decode(&line, &mut ids).unwrap();
//! assert_eq!(decoded, item);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod money;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{FormatError, ParseMoneyError, ValidationError};
pub use money::Money;
pub use sequence::{IdSequence, ItemId};
pub use types::*;
pub use validation::ValidationResult;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category used by the shorthand add (name, quantity, cost).
pub const DEFAULT_CATEGORY: &str = "General";

/// Minimum stock threshold applied when a new item does not specify one.
pub const DEFAULT_MINIMUM_STOCK: i64 = 5;

/// Window used by "expiring soon" checks when the caller has no preference.
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 30;

/// Seconds in a day, for expiry windows.
pub const SECONDS_PER_DAY: i64 = 86_400;
