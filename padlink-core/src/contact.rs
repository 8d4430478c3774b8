//! Platform pointer id → compact contact id table.
//!
//! Multi-touch wire protocols want small per-finger identifiers that
//! stay stable for the lifetime of one finger. The platform recycles its
//! own pointer ids unpredictably, so every newly seen pointer gets the
//! next value of a monotonic counter. A released id is never handed out
//! again while the counter has not wrapped.

use std::collections::HashMap;

/// Allocates contact ids for live platform pointers.
///
/// This table is the only place pointer→contact mappings are created or
/// destroyed; [`allocate`](Self::allocate) and [`release`](Self::release)
/// are its sole mutation entry points besides [`drain`](Self::drain).
#[derive(Debug, Default)]
pub struct ContactIdAllocator {
    contacts: HashMap<i32, u32>,
    next_id: u32,
}

impl ContactIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the contact id for `pointer_id`, assigning a fresh one if
    /// the pointer is not mapped yet.
    pub fn allocate(&mut self, pointer_id: i32) -> u32 {
        if let Some(&contact_id) = self.contacts.get(&pointer_id) {
            return contact_id;
        }
        let contact_id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.contacts.insert(pointer_id, contact_id);
        contact_id
    }

    /// Existing mapping, if any.
    pub fn get(&self, pointer_id: i32) -> Option<u32> {
        self.contacts.get(&pointer_id).copied()
    }

    /// Remove the mapping. Releasing an unmapped id is a no-op: cancel
    /// paths routinely race with up events.
    pub fn release(&mut self, pointer_id: i32) -> Option<u32> {
        self.contacts.remove(&pointer_id)
    }

    /// Remove every mapping, returned as `(pointer_id, contact_id)` in
    /// contact-id order.
    pub fn drain(&mut self) -> Vec<(i32, u32)> {
        let mut all: Vec<(i32, u32)> = self.contacts.drain().collect();
        all.sort_by_key(|&(_, contact_id)| contact_id);
        all
    }

    /// Number of live contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────
