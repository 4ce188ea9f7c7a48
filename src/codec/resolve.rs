//! Media/relation identifier resolution
//!
//! Callers may reference targets by numeric id or by public UUID. Numeric
//! identifiers pass through; UUIDs are looked up against the asset catalog
//! (media) or entry table (relation). Unresolvable identifiers are dropped
//! silently, duplicates removed preserving first occurrence.

use uuid::Uuid;

use crate::schema::{CollectionId, FieldType};

/// Read-only asset catalog lookup
pub trait AssetLookup {
    /// Resolves an asset's public UUID to its numeric id
    fn asset_id_by_uuid(&self, uuid: &Uuid) -> Option<i64>;
}

/// Read-only entry lookup
pub trait EntryLookup {
    /// Resolves an entry's public UUID to its numeric id, optionally scoped
    /// to one collection
    fn entry_id_by_uuid(&self, collection: Option<CollectionId>, uuid: &Uuid) -> Option<i64>;
}

/// Resolver combining both lookup seams
pub struct IdResolver<'a> {
    pub assets: &'a dyn AssetLookup,
    pub entries: &'a dyn EntryLookup,
}

impl<'a> IdResolver<'a> {
    pub fn new(assets: &'a dyn AssetLookup, entries: &'a dyn EntryLookup) -> Self {
        Self { assets, entries }
    }

    /// Resolves a raw identifier list for a media or relation field.
    ///
    /// Accepts a scalar or an array; every element resolves independently.
    pub fn resolve(
        &self,
        field_type: FieldType,
        target: Option<CollectionId>,
        raw: &serde_json::Value,
    ) -> Vec<i64> {
        let items: Vec<&serde_json::Value> = match raw {
            serde_json::Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            if let Some(id) = self.resolve_one(field_type, target, item) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    fn resolve_one(
        &self,
        field_type: FieldType,
        target: Option<CollectionId>,
        raw: &serde_json::Value,
    ) -> Option<i64> {
        match raw {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => {
                if let Ok(id) = s.parse::<i64>() {
                    return Some(id);
                }
                let uuid = Uuid::parse_str(s).ok()?;
                match field_type {
                    FieldType::Media => self.assets.asset_id_by_uuid(&uuid),
                    FieldType::Relation => self.entries.entry_id_by_uuid(target, &uuid),
                    // Non-linking types never reach resolution
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
