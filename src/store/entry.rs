//! Content entry table

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{CollectionId, ProjectId};

/// Entry identifier
pub type EntryId = i64;

/// Lifecycle status of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Published,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Published => "published",
        }
    }

    /// Parses a status name; unknown names yield None
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(EntryStatus::Draft),
            "published" => Some(EntryStatus::Published),
            _ => None,
        }
    }
}

/// One unit of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Internal identifier
    pub id: EntryId,
    /// Public identifier
    pub uuid: Uuid,
    pub project_id: ProjectId,
    pub collection_id: CollectionId,
    pub locale: String,
    pub status: EntryStatus,
    /// Links sibling-locale entries sharing one logical document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_group: Option<i64>,
    /// Soft-delete marker; set entries are invisible to every read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntry {
    /// Returns true when the entry has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// In-memory entry table keyed by id
#[derive(Debug, Default)]
pub struct EntryTable {
    rows: BTreeMap<EntryId, ContentEntry>,
    next_id: EntryId,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new entry row and returns its id
    pub fn create(
        &mut self,
        project_id: ProjectId,
        collection_id: CollectionId,
        locale: impl Into<String>,
        status: EntryStatus,
        translation_group: Option<i64>,
    ) -> EntryId {
        self.next_id += 1;
        let id = self.next_id;
        let now = Utc::now();
        self.rows.insert(
            id,
            ContentEntry {
                id,
                uuid: Uuid::new_v4(),
                project_id,
                collection_id,
                locale: locale.into(),
                status,
                translation_group,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn get(&self, id: EntryId) -> Option<&ContentEntry> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut ContentEntry> {
        self.rows.get_mut(&id)
    }

    /// Finds a live entry by public UUID, optionally scoped to a collection
    pub fn by_uuid(&self, collection: Option<CollectionId>, uuid: &Uuid) -> Option<&ContentEntry> {
        self.rows.values().find(|e| {
            e.uuid == *uuid
                && !e.is_deleted()
                && collection.map(|c| e.collection_id == c).unwrap_or(true)
        })
    }

    /// Removes an entry row entirely (hard delete)
    pub fn remove(&mut self, id: EntryId) -> Option<ContentEntry> {
        self.rows.remove(&id)
    }

    /// Iterates rows in id order
    pub fn iter(&self) -> impl Iterator<Item = &ContentEntry> {
        self.rows.values()
    }
}
