//! # Id Sequence
//!
//! Hands out item ids. One sequence belongs to one store; there is no
//! process-wide counter.
//!
//! ```text
//!   allocate() → 1, 2, 3 ...
//!   observe(40)   (an item with id 40 was loaded from disk)
//!   allocate() → 41
//!   observe(7)    (no effect, the sequence never moves backwards)
//!   allocate() → 42
//!   observe(u64::MAX)
//!   allocate() → Err(IdsExhausted)
//! ```

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Identifier of an inventory item.
pub type ItemId = u64;

/// Monotonic id allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    /// `None` once `u64::MAX` is in use.
    next: Option<ItemId>,
}

impl IdSequence {
    /// Starts a fresh sequence whose first id is 1.
    pub fn new() -> Self {
        IdSequence { next: Some(1) }
    }

    /// Returns the next id and advances the sequence.
    pub fn allocate(&mut self) -> ValidationResult<ItemId> {
        let id = self.peek()?;
        self.next = id.checked_add(1);
        Ok(id)
    }

    /// Records that `id` is in use, so it is never allocated again.
    pub fn observe(&mut self, id: ItemId) {
        self.next = match (self.next, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
    }

    /// The id the next `allocate` call will return.
    pub fn peek(&self) -> ValidationResult<ItemId> {
        self.next.ok_or(ValidationError::IdsExhausted)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
