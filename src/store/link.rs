//! Relation and media link tables
//!
//! Ordered join rows connecting a field value to content entries or binary
//! assets. The set owned by one value is always replaced wholesale
//! (delete-then-insert); it is never patched incrementally, so stale
//! duplicates cannot survive an update.

use super::value::ValueId;

/// One ordered link owned by a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub value_id: ValueId,
    /// Target entry id (relation table) or asset id (media table)
    pub target_id: i64,
    pub sort_order: u32,
}

/// In-memory link table; the store holds one for media and one for relations
#[derive(Debug, Default)]
pub struct LinkTable {
    rows: Vec<Link>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full link set of one value. An empty id list clears the
    /// set rather than leaving it untouched.
    pub fn replace_links(&mut self, value_id: ValueId, ordered_ids: &[i64]) {
        self.rows.retain(|l| l.value_id != value_id);
        for (index, target_id) in ordered_ids.iter().enumerate() {
            self.rows.push(Link {
                value_id,
                target_id: *target_id,
                sort_order: index as u32,
            });
        }
    }

    /// Links owned by one value, in sort order
    pub fn links_for(&self, value_id: ValueId) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .rows
            .iter()
            .filter(|l| l.value_id == value_id)
            .copied()
            .collect();
        links.sort_by_key(|l| l.sort_order);
        links
    }

    /// Number of links owned by one value
    pub fn count_for(&self, value_id: ValueId) -> usize {
        self.rows.iter().filter(|l| l.value_id == value_id).count()
    }

    /// Cascade used when value rows are deleted
    pub fn delete_for_values(&mut self, value_ids: &[ValueId]) {
        self.rows.retain(|l| !value_ids.contains(&l.value_id));
    }
}
