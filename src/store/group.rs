//! Group instance table
//!
//! A group instance is one repetition of a group field's sub-schema. Sort
//! order is dense and 0-based within an entry + field scope; non-repeatable
//! groups hold exactly one instance.

use std::collections::BTreeMap;

use crate::schema::FieldId;

use super::entry::EntryId;

/// Group instance identifier
pub type GroupInstanceId = i64;

/// One repetition of a group field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInstance {
    pub id: GroupInstanceId,
    pub entry_id: EntryId,
    pub field_id: FieldId,
    pub sort_order: u32,
}

/// In-memory group instance table
#[derive(Debug, Default)]
pub struct GroupTable {
    rows: BTreeMap<GroupInstanceId, GroupInstance>,
    next_id: GroupInstanceId,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one instance and returns its id
    pub fn create(&mut self, entry_id: EntryId, field_id: FieldId, sort_order: u32) -> GroupInstanceId {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.insert(
            id,
            GroupInstance {
                id,
                entry_id,
                field_id,
                sort_order,
            },
        );
        id
    }

    /// Instances of one field within an entry, in sort order
    pub fn for_field(&self, entry_id: EntryId, field_id: FieldId) -> Vec<GroupInstance> {
        let mut rows: Vec<GroupInstance> = self
            .rows
            .values()
            .filter(|g| g.entry_id == entry_id && g.field_id == field_id)
            .copied()
            .collect();
        rows.sort_by_key(|g| (g.sort_order, g.id));
        rows
    }

    /// Deletes all instances of one field, returning the removed ids so the
    /// caller can cascade child value rows
    pub fn delete_for_field(&mut self, entry_id: EntryId, field_id: FieldId) -> Vec<GroupInstanceId> {
        let ids: Vec<GroupInstanceId> = self
            .rows
            .values()
            .filter(|g| g.entry_id == entry_id && g.field_id == field_id)
            .map(|g| g.id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }

    /// Deletes all instances of an entry, returning the removed ids
    pub fn delete_for_entry(&mut self, entry_id: EntryId) -> Vec<GroupInstanceId> {
        let ids: Vec<GroupInstanceId> = self
            .rows
            .values()
            .filter(|g| g.entry_id == entry_id)
            .map(|g| g.id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }
}
