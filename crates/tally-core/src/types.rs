//! # Domain Types
//!
//! The inventory entity and the values that flow in and out of it.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   Item::new    ┌─────────────────┐                │
//! │  │    NewItem      │ ─────────────► │      Item       │                │
//! │  │  ─────────────  │                │  ─────────────  │                │
//! │  │  draft fields   │                │  id (ItemId)    │                │
//! │  │  Option min     │                │  barcode        │                │
//! │  └─────────────────┘                │  timestamps     │                │
//! │                                     │  private fields │                │
//! │  ┌─────────────────┐   from_parts   │  + setters      │                │
//! │  │   ItemParts     │ ─────────────► │                 │                │
//! │  │  (decoded line) │                └────────┬────────┘                │
//! │  └─────────────────┘                         │                         │
//! │                                              │ apply_to                │
//! │  ┌─────────────────┐                ┌────────▼────────┐                │
//! │  │   ItemUpdate    │ ─────────────► │ UpdateOutcome   │                │
//! │  │  all Option<_>  │                │ applied/rejected│                │
//! │  └─────────────────┘                └─────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Privacy
//! `Item` keeps its fields private. Every write goes through a setter that
//! validates the new value and bumps `last_modified`, so an `Item` in hand
//! always satisfies the entity invariants.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::sequence::ItemId;
use crate::validation::{
    apply_delta, validate_amount, validate_count, validate_item_name, validate_timestamps,
    ValidationResult,
};
use crate::{DEFAULT_MINIMUM_STOCK, SECONDS_PER_DAY};

// =============================================================================
// Clock & Barcode Helpers
// =============================================================================

/// Current time at whole-second precision.
///
/// The backing file stores epoch seconds, so anything finer would be lost
/// on the first save.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Generates a random 9-digit numeric barcode.
pub fn generate_barcode() -> String {
    rand::rng()
        .random_range(100_000_000u32..=999_999_999)
        .to_string()
}

/// Whole-second expiry; the epoch itself means "no expiry" because the
/// record format writes `0` for none.
fn stored_expiry(expiry: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    expiry
        .map(|d| d.trunc_subsecs(0))
        .filter(|d| d.timestamp() != 0)
}

// =============================================================================
// Stock Status
// =============================================================================

/// Single display status for an item. First match wins, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Quantity at or below the minimum stock threshold.
    Low,
    /// Expiry date has passed.
    Expired,
    /// Expires within the configured window.
    ExpiringSoon,
    /// Nothing to flag.
    Ok,
}

impl StockStatus {
    /// Short label for table columns.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Low => "LOW",
            StockStatus::Expired => "EXPIRED",
            StockStatus::ExpiringSoon => "EXP SOON",
            StockStatus::Ok => "OK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// New Item (draft)
// =============================================================================

/// Everything a caller supplies to create an item.
///
/// ## Example
/// ```rust
/// use tally_core::{Money, NewItem};
///
/// let draft = NewItem::new("Widget", "Tools", 10, Money::from_cents(250))
///     .selling_price(Money::from_cents(400))
///     .supplier("TechCorp")
///     .minimum_stock(0);
/// assert_eq!(draft.minimum_stock, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub cost: Money,
    pub selling_price: Money,
    pub supplier: String,
    pub location: String,
    /// `None` uses the default threshold; `Some(0)` means "never low".
    pub minimum_stock: Option<i64>,
    pub description: String,
    /// An expiry at the epoch is stored as no expiry.
    pub expiry_date: Option<DateTime<Utc>>,
}

impl NewItem {
    /// Creates a draft with the required fields; optional fields start empty.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        cost: Money,
    ) -> Self {
        NewItem {
            name: name.into(),
            category: category.into(),
            quantity,
            cost,
            selling_price: Money::zero(),
            supplier: String::new(),
            location: String::new(),
            minimum_stock: None,
            description: String::new(),
            expiry_date: None,
        }
    }

    pub fn selling_price(mut self, price: Money) -> Self {
        self.selling_price = price;
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn minimum_stock(mut self, minimum: i64) -> Self {
        self.minimum_stock = Some(minimum);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn expiry_date(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry);
        self
    }
}

// =============================================================================
// Item Parts (stored form)
// =============================================================================

/// Every field of a stored item, as read back from a record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemParts {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub barcode: String,
    pub quantity: i64,
    pub minimum_stock: i64,
    pub cost: Money,
    pub selling_price: Money,
    pub date_added: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub location: String,
    pub description: String,
}

// =============================================================================
// Item
// =============================================================================

/// One inventory line item.
///
/// ## Derived Values
/// ```text
/// total_value       = quantity × cost
/// potential_revenue = quantity × selling_price
/// profit            = (selling_price − cost) × quantity
/// profit_margin     = (selling_price − cost) / cost × 100   (0 when cost is 0)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    category: String,
    supplier: String,
    barcode: String,
    quantity: i64,
    minimum_stock: i64,
    cost: Money,
    selling_price: Money,
    date_added: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    expiry_date: Option<DateTime<Utc>>,
    location: String,
    description: String,
}

impl Item {
    /// Builds a new item from a draft, stamping timestamps and a barcode.
    ///
    /// Fails if the name is blank or any count/amount is negative.
    pub fn new(id: ItemId, draft: NewItem) -> ValidationResult<Self> {
        let minimum_stock = draft.minimum_stock.unwrap_or(DEFAULT_MINIMUM_STOCK);

        validate_item_name(&draft.name)?;
        validate_count("quantity", draft.quantity)?;
        validate_count("minimum stock", minimum_stock)?;
        validate_amount("cost", draft.cost)?;
        validate_amount("selling price", draft.selling_price)?;

        let created = now();
        Ok(Item {
            id,
            name: draft.name,
            category: draft.category,
            supplier: draft.supplier,
            barcode: generate_barcode(),
            quantity: draft.quantity,
            minimum_stock,
            cost: draft.cost,
            selling_price: draft.selling_price,
            date_added: created,
            last_modified: created,
            expiry_date: stored_expiry(draft.expiry_date),
            location: draft.location,
            description: draft.description,
        })
    }

    /// Rebuilds a stored item, applying the same rules as `new` plus the
    /// timestamp ordering.
    pub fn from_parts(parts: ItemParts) -> ValidationResult<Self> {
        validate_item_name(&parts.name)?;
        validate_count("quantity", parts.quantity)?;
        validate_count("minimum stock", parts.minimum_stock)?;
        validate_amount("cost", parts.cost)?;
        validate_amount("selling price", parts.selling_price)?;
        validate_timestamps(parts.date_added, parts.last_modified)?;

        Ok(Item {
            id: parts.id,
            name: parts.name,
            category: parts.category,
            supplier: parts.supplier,
            barcode: parts.barcode,
            quantity: parts.quantity,
            minimum_stock: parts.minimum_stock,
            cost: parts.cost,
            selling_price: parts.selling_price,
            date_added: parts.date_added,
            last_modified: parts.last_modified,
            expiry_date: stored_expiry(parts.expiry_date),
            location: parts.location,
            description: parts.description,
        })
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn minimum_stock(&self) -> i64 {
        self.minimum_stock
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn selling_price(&self) -> Money {
        self.selling_price
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn expiry_date(&self) -> Option<DateTime<Utc>> {
        self.expiry_date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    /// Never lets last_modified fall behind date_added, even if the wall
    /// clock stepped backwards since the item was created.
    fn touch(&mut self) {
        self.last_modified = now().max(self.date_added);
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        let name = name.into();
        validate_item_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: i64) -> ValidationResult<()> {
        validate_count("quantity", quantity)?;
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    pub fn set_minimum_stock(&mut self, minimum: i64) -> ValidationResult<()> {
        validate_count("minimum stock", minimum)?;
        self.minimum_stock = minimum;
        self.touch();
        Ok(())
    }

    pub fn set_cost(&mut self, cost: Money) -> ValidationResult<()> {
        validate_amount("cost", cost)?;
        self.cost = cost;
        self.touch();
        Ok(())
    }

    pub fn set_selling_price(&mut self, price: Money) -> ValidationResult<()> {
        validate_amount("selling price", price)?;
        self.selling_price = price;
        self.touch();
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.touch();
    }

    pub fn set_supplier(&mut self, supplier: impl Into<String>) {
        self.supplier = supplier.into();
        self.touch();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// `None` (or the epoch) clears the expiry.
    pub fn set_expiry_date(&mut self, expiry: Option<DateTime<Utc>>) {
        self.expiry_date = stored_expiry(expiry);
        self.touch();
    }

    /// Adds `delta` to the quantity and returns the new quantity.
    ///
    /// The quantity is unchanged on error.
    pub fn adjust_quantity(&mut self, delta: i64) -> ValidationResult<i64> {
        let next = apply_delta(self.quantity, delta)?;
        self.quantity = next;
        self.touch();
        Ok(next)
    }

    // -------------------------------------------------------------------------
    // Derived Values
    // -------------------------------------------------------------------------

    pub fn total_value(&self) -> Money {
        self.cost.multiply_quantity(self.quantity)
    }

    pub fn potential_revenue(&self) -> Money {
        self.selling_price.multiply_quantity(self.quantity)
    }

    pub fn profit(&self) -> Money {
        (self.selling_price - self.cost).multiply_quantity(self.quantity)
    }

    /// Margin over cost as a percentage. Display only.
    pub fn profit_margin(&self) -> f64 {
        self.selling_price.percent_over(self.cost)
    }

    // -------------------------------------------------------------------------
    // Status Predicates
    // -------------------------------------------------------------------------

    /// Inclusive: quantity equal to the threshold is already low.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now)
    }

    /// Expires within `days` days from now. Already-expired items count.
    pub fn is_expiring_soon(&self, days: u32) -> bool {
        self.is_expiring_soon_at(days, Utc::now())
    }

    pub fn is_expiring_soon_at(&self, days: u32, now: DateTime<Utc>) -> bool {
        let Some(expiry) = self.expiry_date else {
            return false;
        };
        let window = Duration::seconds(i64::from(days) * SECONDS_PER_DAY);
        match now.checked_add_signed(window) {
            Some(threshold) => expiry <= threshold,
            None => true,
        }
    }

    pub fn stock_status(&self, expiring_soon_days: u32) -> StockStatus {
        self.stock_status_at(expiring_soon_days, Utc::now())
    }

    pub fn stock_status_at(&self, expiring_soon_days: u32, now: DateTime<Utc>) -> StockStatus {
        if self.is_low_stock() {
            StockStatus::Low
        } else if self.is_expired_at(now) {
            StockStatus::Expired
        } else if self.is_expiring_soon_at(expiring_soon_days, now) {
            StockStatus::ExpiringSoon
        } else {
            StockStatus::Ok
        }
    }
}

// =============================================================================
// Item Update
// =============================================================================

/// A partial update. `None` leaves the field as it is.
///
/// ## Example
/// ```rust
/// use tally_core::{Item, ItemUpdate, Money, NewItem};
///
/// let mut item = Item::new(1, NewItem::new("Widget", "Tools", 10, Money::from_cents(250))).unwrap();
/// let outcome = ItemUpdate {
///     name: Some("Gadget".to_string()),
///     quantity: Some(-4),
///     ..Default::default()
/// }
/// .apply_to(&mut item);
///
/// assert_eq!(outcome.applied, vec!["name"]);
/// assert_eq!(outcome.rejected.len(), 1);
/// assert_eq!(item.name(), "Gadget");
/// assert_eq!(item.quantity(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub minimum_stock: Option<i64>,
    pub cost: Option<Money>,
    pub selling_price: Option<Money>,
    /// `Some(None)` clears the expiry; `None` leaves it alone.
    pub expiry_date: Option<Option<DateTime<Utc>>>,
}

/// What an `ItemUpdate` did, field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Names of fields that now hold the new value.
    pub applied: Vec<&'static str>,
    /// Fields whose new value failed validation.
    pub rejected: Vec<ValidationError>,
}

impl UpdateOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }

    fn record(&mut self, field: &'static str, result: ValidationResult<()>) {
        match result {
            Ok(()) => self.applied.push(field),
            Err(e) => self.rejected.push(e),
        }
    }
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ItemUpdate::default()
    }

    /// Applies each provided field independently. A rejected field does not
    /// stop the others.
    pub fn apply_to(self, item: &mut Item) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        if let Some(name) = self.name {
            outcome.record("name", item.set_name(name));
        }
        if let Some(category) = self.category {
            item.set_category(category);
            outcome.applied.push("category");
        }
        if let Some(supplier) = self.supplier {
            item.set_supplier(supplier);
            outcome.applied.push("supplier");
        }
        if let Some(location) = self.location {
            item.set_location(location);
            outcome.applied.push("location");
        }
        if let Some(description) = self.description {
            item.set_description(description);
            outcome.applied.push("description");
        }
        if let Some(quantity) = self.quantity {
            outcome.record("quantity", item.set_quantity(quantity));
        }
        if let Some(minimum) = self.minimum_stock {
            outcome.record("minimum stock", item.set_minimum_stock(minimum));
        }
        if let Some(cost) = self.cost {
            outcome.record("cost", item.set_cost(cost));
        }
        if let Some(price) = self.selling_price {
            outcome.record("selling price", item.set_selling_price(price));
        }
        if let Some(expiry) = self.expiry_date {
            item.set_expiry_date(expiry);
            outcome.applied.push("expiry date");
        }

        outcome
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
