//! # Identifier Allocator
//!
//! Hands out fresh integer identifiers that never collide with identifiers the
//! caller chose explicitly.
//!
//! The allocator keeps a single candidate counter. Every explicit integer
//! identifier at or above the candidate pushes the candidate past it, and the
//! counter never moves backwards, so an identifier is never issued twice even
//! after the entity holding it has been removed. String identifiers leave the
//! counter alone.

use crate::Id;
use crate::primitives::FIRST_AUTO_ID;

/// Monotonic identifier counter for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: i64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: FIRST_AUTO_ID,
        }
    }
}

impl IdAllocator {
    /// Create an allocator starting at [`FIRST_AUTO_ID`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next candidate that would be tried.
    #[must_use]
    pub fn peek(&self) -> i64 {
        self.next
    }

    /// Record an explicitly chosen identifier.
    pub fn observe(&mut self, id: &Id) {
        if let Id::Int(value) = id {
            if *value >= self.next {
                self.next = value.saturating_add(1);
            }
        }
    }

    /// Issue the first candidate for which `taken` is false.
    pub fn allocate(&mut self, taken: impl Fn(&Id) -> bool) -> Id {
        loop {
            let candidate = Id::Int(self.next);
            self.next = self.next.saturating_add(1);
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn allocates_sequentially() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate(|_| false), Id::from(0));
        assert_eq!(alloc.allocate(|_| false), Id::from(1));
    }

    #[test]
    fn explicit_integer_advances_counter() {
        let mut alloc = IdAllocator::new();
        alloc.observe(&Id::from(10));
        assert_eq!(alloc.allocate(|_| false), Id::from(11));
    }

    #[test]
    fn smaller_or_string_ids_do_not_move_counter() {
        let mut alloc = IdAllocator::new();
        alloc.observe(&Id::from(5));
        alloc.observe(&Id::from(2));
        alloc.observe(&Id::from("seven"));
        assert_eq!(alloc.peek(), 6);
    }

    #[test]
    fn skips_claimed_candidates() {
        let claimed: BTreeSet<Id> = [Id::from(0), Id::from(1)].into_iter().collect();
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate(|id| claimed.contains(id)), Id::from(2));
    }
}
