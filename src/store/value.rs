//! Attribute value table
//!
//! One row per (entry, field) pair, or per (entry, field, group instance)
//! for fields inside a group. Repeatable fields write one row per item with
//! an explicit sort order, so read-back order is a stored property.

use std::collections::BTreeMap;

use crate::codec::ValueColumns;
use crate::schema::{FieldId, FieldType};

use super::entry::EntryId;
use super::group::GroupInstanceId;

/// Field value row identifier
pub type ValueId = i64;

/// One stored attribute value
#[derive(Debug, Clone)]
pub struct FieldValue {
    pub id: ValueId,
    pub entry_id: EntryId,
    pub field_id: FieldId,
    /// Denormalized declared type for fast dispatch on read
    pub field_type: FieldType,
    /// Set when the row belongs to one group repetition
    pub group_instance_id: Option<GroupInstanceId>,
    /// Position within a repeatable field, 0 for plain scalars
    pub sort_order: u32,
    pub columns: ValueColumns,
}

/// In-memory field value table
#[derive(Debug, Default)]
pub struct ValueTable {
    rows: BTreeMap<ValueId, FieldValue>,
    next_id: ValueId,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one value row and returns its id
    pub fn insert(
        &mut self,
        entry_id: EntryId,
        field_id: FieldId,
        field_type: FieldType,
        group_instance_id: Option<GroupInstanceId>,
        sort_order: u32,
        columns: ValueColumns,
    ) -> ValueId {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.insert(
            id,
            FieldValue {
                id,
                entry_id,
                field_id,
                field_type,
                group_instance_id,
                sort_order,
                columns,
            },
        );
        id
    }

    pub fn get(&self, id: ValueId) -> Option<&FieldValue> {
        self.rows.get(&id)
    }

    /// All rows of one entry, in row-id order
    pub fn for_entry(&self, entry_id: EntryId) -> Vec<&FieldValue> {
        self.rows
            .values()
            .filter(|v| v.entry_id == entry_id)
            .collect()
    }

    /// Rows of one field within an entry, scoped to a group instance (or to
    /// no instance), ordered by sort order
    pub fn for_field(
        &self,
        entry_id: EntryId,
        field_id: FieldId,
        group_instance_id: Option<GroupInstanceId>,
    ) -> Vec<&FieldValue> {
        let mut rows: Vec<&FieldValue> = self
            .rows
            .values()
            .filter(|v| {
                v.entry_id == entry_id
                    && v.field_id == field_id
                    && v.group_instance_id == group_instance_id
            })
            .collect();
        rows.sort_by_key(|v| (v.sort_order, v.id));
        rows
    }

    /// Rows of one field within an entry regardless of instance scope
    pub fn for_field_any_scope(&self, entry_id: EntryId, field_id: FieldId) -> Vec<&FieldValue> {
        let mut rows: Vec<&FieldValue> = self
            .rows
            .values()
            .filter(|v| v.entry_id == entry_id && v.field_id == field_id)
            .collect();
        rows.sort_by_key(|v| (v.sort_order, v.id));
        rows
    }

    /// Deletes every row of an entry, returning the removed row ids so the
    /// caller can cascade owned links
    pub fn delete_for_entry(&mut self, entry_id: EntryId) -> Vec<ValueId> {
        let ids: Vec<ValueId> = self
            .rows
            .values()
            .filter(|v| v.entry_id == entry_id)
            .map(|v| v.id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }

    /// Deletes the directly-owned rows of one field (not group children),
    /// returning the removed row ids
    pub fn delete_for_field(&mut self, entry_id: EntryId, field_id: FieldId) -> Vec<ValueId> {
        let ids: Vec<ValueId> = self
            .rows
            .values()
            .filter(|v| v.entry_id == entry_id && v.field_id == field_id)
            .map(|v| v.id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }

    /// Deletes rows scoped to the given group instances, returning the
    /// removed row ids
    pub fn delete_for_instances(&mut self, instance_ids: &[GroupInstanceId]) -> Vec<ValueId> {
        let ids: Vec<ValueId> = self
            .rows
            .values()
            .filter(|v| {
                v.group_instance_id
                    .map(|g| instance_ids.contains(&g))
                    .unwrap_or(false)
            })
            .map(|v| v.id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Value;

    fn text_columns(s: &str) -> ValueColumns {
        Value::Text(s.into()).into_columns()
    }

    #[test]
    fn test_sort_order_drives_read_back() {
        let mut table = ValueTable::new();
        // Insert out of order; sort_order must win
        table.insert(1, 10, FieldType::Text, None, 2, text_columns("c"));
        table.insert(1, 10, FieldType::Text, None, 0, text_columns("a"));
        table.insert(1, 10, FieldType::Text, None, 1, text_columns("b"));

        let rows = table.for_field(1, 10, None);
        let texts: Vec<_> = rows
            .iter()
            .map(|r| r.columns.text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_group_scope_isolation() {
        let mut table = ValueTable::new();
        table.insert(1, 10, FieldType::Text, Some(5), 0, text_columns("in-group"));
        table.insert(1, 10, FieldType::Text, None, 0, text_columns("top-level"));

        assert_eq!(table.for_field(1, 10, Some(5)).len(), 1);
        assert_eq!(table.for_field(1, 10, None).len(), 1);
        assert_eq!(table.for_field_any_scope(1, 10).len(), 2);
    }

    #[test]
    fn test_delete_for_entry_returns_removed_ids() {
        let mut table = ValueTable::new();
        let a = table.insert(1, 10, FieldType::Text, None, 0, text_columns("x"));
        let b = table.insert(1, 11, FieldType::Text, None, 0, text_columns("y"));
        table.insert(2, 10, FieldType::Text, None, 0, text_columns("z"));

        let removed = table.delete_for_entry(1);
        assert_eq!(removed, vec![a, b]);
        assert!(table.for_entry(1).is_empty());
        assert_eq!(table.for_entry(2).len(), 1);
    }

    #[test]
    fn test_delete_for_instances() {
        let mut table = ValueTable::new();
        table.insert(1, 10, FieldType::Text, Some(5), 0, text_columns("a"));
        table.insert(1, 10, FieldType::Text, Some(6), 0, text_columns("b"));
        table.insert(1, 10, FieldType::Text, Some(7), 0, text_columns("c"));

        let removed = table.delete_for_instances(&[5, 6]);
        assert_eq!(removed.len(), 2);
        assert_eq!(table.for_field_any_scope(1, 10).len(), 1);
    }
}
