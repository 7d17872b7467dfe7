use std::collections::HashMap;

use crate::resolve::{ClassRef, ObjectHandle};

/// What a reference-table slot can hold.
#[derive(Clone, Debug)]
pub enum RefItem {
    /// A class descriptor registered when its name first appeared.
    Class(ClassRef),
    /// A previously materialized object.
    Object(ObjectHandle),
}

/// Back-reference table for one top-level object-graph read.
///
/// Keys are positions relative to the chunk origin (plus the protocol's
/// fixed key offset); decompressed chunks do not preserve absolute file
/// offsets, so absolute positions would never match the keys the writer
/// computed. The table is owned by the top-level read, passed `&mut` through
/// the whole recursive decode, and discarded when that read completes.
#[derive(Debug, Default)]
pub struct RefTable {
    slots: HashMap<u64, RefItem>,
    sequence: u64,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u64) -> Option<&RefItem> {
        self.slots.get(&key)
    }

    pub fn insert(&mut self, key: u64, item: RefItem) {
        self.slots.insert(key, item);
    }

    /// Insert under the next sequence key, used by streams whose headers
    /// carry no byte counts and therefore no positional keys.
    pub fn insert_sequential(&mut self, item: RefItem) -> u64 {
        self.sequence += 1;
        self.slots.insert(self.sequence, item);
        self.sequence
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
