//! Asset catalog
//!
//! Minimal catalog used for media identifier resolution. Upload, storage,
//! and derivative generation are external collaborators.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Asset identifier
pub type AssetId = i64;

/// One registered binary asset
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub id: AssetId,
    pub uuid: Uuid,
    pub filename: String,
}

/// In-memory asset catalog keyed by id
#[derive(Debug, Default)]
pub struct AssetTable {
    rows: BTreeMap<AssetId, AssetRecord>,
    next_id: AssetId,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset and returns its id
    pub fn register(&mut self, filename: impl Into<String>) -> AssetId {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.insert(
            id,
            AssetRecord {
                id,
                uuid: Uuid::new_v4(),
                filename: filename.into(),
            },
        );
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&AssetRecord> {
        self.rows.get(&id)
    }

    pub fn by_uuid(&self, uuid: &Uuid) -> Option<&AssetRecord> {
        self.rows.values().find(|a| a.uuid == *uuid)
    }
}
