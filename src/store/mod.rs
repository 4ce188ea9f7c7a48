//! Persistence layer for versocms
//!
//! Five in-memory tables mirroring the persisted layout: entries, field
//! values (eight physical columns + field reference + optional group
//! instance reference + sort order), group instances, two link tables
//! (media, relation), and the asset catalog.
//!
//! # Atomicity
//!
//! Write operations take `&mut ContentStore`; the exclusive borrow is the
//! transaction boundary, so a delete+insert sequence over one entry's
//! field-value set is never observable half-applied. Readers take
//! `&ContentStore` and may run with any external concurrency.

mod asset;
mod entry;
mod errors;
mod group;
mod link;
mod value;

pub use asset::{AssetId, AssetRecord, AssetTable};
pub use entry::{ContentEntry, EntryId, EntryStatus, EntryTable};
pub use errors::{StoreError, StoreResult};
pub use group::{GroupInstance, GroupInstanceId, GroupTable};
pub use link::{Link, LinkTable};
pub use value::{FieldValue, ValueId, ValueTable};

use uuid::Uuid;

use crate::codec::{AssetLookup, EntryLookup};
use crate::schema::{CollectionId, FieldId};

/// The complete persisted state of one deployment
#[derive(Debug, Default)]
pub struct ContentStore {
    pub entries: EntryTable,
    pub values: ValueTable,
    pub groups: GroupTable,
    pub media_links: LinkTable,
    pub relation_links: LinkTable,
    pub assets: AssetTable,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes every value row, group instance, and owned link of an entry.
    /// Returns the number of value rows removed.
    pub fn clear_entry_values(&mut self, entry_id: EntryId) -> usize {
        let removed_values = self.values.delete_for_entry(entry_id);
        self.groups.delete_for_entry(entry_id);
        self.media_links.delete_for_values(&removed_values);
        self.relation_links.delete_for_values(&removed_values);
        removed_values.len()
    }

    /// Deletes one field's rows including group instances and their
    /// children, cascading owned links. Returns the removed value row ids.
    pub fn clear_field_values(&mut self, entry_id: EntryId, field_id: FieldId) -> Vec<ValueId> {
        let mut removed = self.values.delete_for_field(entry_id, field_id);
        let instances = self.groups.delete_for_field(entry_id, field_id);
        removed.extend(self.values.delete_for_instances(&instances));
        self.media_links.delete_for_values(&removed);
        self.relation_links.delete_for_values(&removed);
        removed
    }
}

impl AssetLookup for ContentStore {
    fn asset_id_by_uuid(&self, uuid: &Uuid) -> Option<i64> {
        self.assets.by_uuid(uuid).map(|a| a.id)
    }
}

impl EntryLookup for ContentStore {
    fn entry_id_by_uuid(&self, collection: Option<CollectionId>, uuid: &Uuid) -> Option<i64> {
        self.entries.by_uuid(collection, uuid).map(|e| e.id)
    }
}
