//! Write path
//!
//! Creates entries and replaces their field-value sets, fanning out through
//! the codec, the group instance manager, and the link stores.
//!
//! # Atomicity
//!
//! Every operation holds the exclusive `&mut ContentStore` borrow for its
//! whole delete+insert sequence, so the unit of atomicity is one entry's
//! field-value set and no reader can observe a half-applied replacement.
//! Concurrent writers racing on the same entry remain last-writer-wins.

use chrono::Utc;

use crate::codec::{encode, IdResolver, Value, WriteDecision};
use crate::observability::{Logger, Severity};
use crate::schema::{Collection, CollectionId, FieldDefinition, FieldType, SchemaRegistry};
use crate::store::{ContentStore, EntryId, EntryStatus, GroupInstanceId};

use super::errors::{QueryError, QueryResult};

/// Write-side handle over the content store
pub struct ContentWriter<'a> {
    store: &'a mut ContentStore,
    registry: &'a SchemaRegistry,
}

impl<'a> ContentWriter<'a> {
    pub fn new(store: &'a mut ContentStore, registry: &'a SchemaRegistry) -> Self {
        Self { store, registry }
    }

    /// Creates an entry and writes the payload's recognized fields.
    ///
    /// Unknown payload keys are silently ignored.
    pub fn create(
        &mut self,
        collection_id: CollectionId,
        locale: impl Into<String>,
        status: EntryStatus,
        translation_group: Option<i64>,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> QueryResult<EntryId> {
        let collection = self.collection(collection_id)?;
        let entry_id = self.store.entries.create(
            collection.project_id,
            collection_id,
            locale,
            status,
            translation_group,
        );

        self.write_payload(entry_id, &collection, payload)?;

        Logger::log(
            Severity::Info,
            "entry_created",
            &[
                ("collection", &collection_id.to_string()),
                ("entry", &entry_id.to_string()),
            ],
        );
        Ok(entry_id)
    }

    /// Full replace: deletes every value row, group instance, and owned
    /// link of the entry, then rewrites from the payload.
    pub fn replace(
        &mut self,
        entry_id: EntryId,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> QueryResult<()> {
        let collection = self.collection_of(entry_id)?;

        self.store.clear_entry_values(entry_id);
        self.write_payload(entry_id, &collection, payload)?;
        self.touch(entry_id);

        Logger::log(
            Severity::Info,
            "values_replaced",
            &[("entry", &entry_id.to_string()), ("mode", "full")],
        );
        Ok(())
    }

    /// Partial replace: rewrites only the fields present in the payload,
    /// preserving untouched fields. An empty incoming password preserves
    /// the stored hash.
    pub fn patch(
        &mut self,
        entry_id: EntryId,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> QueryResult<()> {
        let collection = self.collection_of(entry_id)?;

        for field in &collection.fields {
            let raw = match payload.get(&field.name) {
                Some(raw) => raw,
                None => continue,
            };
            if field.field_type == FieldType::Password && is_empty_secret(raw) {
                continue;
            }
            self.store.clear_field_values(entry_id, field.id);
            self.write_field(entry_id, field, None, raw)?;
        }
        self.touch(entry_id);

        Logger::log(
            Severity::Info,
            "values_replaced",
            &[("entry", &entry_id.to_string()), ("mode", "partial")],
        );
        Ok(())
    }

    /// Destroys an entry: soft-delete marker by default, hard delete
    /// cascading values, instances, and links when requested.
    pub fn destroy(&mut self, entry_id: EntryId, hard: bool) -> QueryResult<()> {
        if hard {
            self.store.clear_entry_values(entry_id);
            self.store
                .entries
                .remove(entry_id)
                .ok_or_else(|| QueryError::EntryNotFound(entry_id.to_string()))?;
        } else {
            let entry = self
                .store
                .entries
                .get_mut(entry_id)
                .ok_or_else(|| QueryError::EntryNotFound(entry_id.to_string()))?;
            let now = Utc::now();
            entry.deleted_at = Some(now);
            entry.updated_at = now;
        }

        Logger::log(
            Severity::Info,
            "entry_destroyed",
            &[
                ("entry", &entry_id.to_string()),
                ("mode", if hard { "hard" } else { "soft" }),
            ],
        );
        Ok(())
    }

    fn collection(&self, collection_id: CollectionId) -> QueryResult<Collection> {
        self.registry
            .collection(collection_id)
            .cloned()
            .ok_or(QueryError::CollectionNotFound(collection_id))
    }

    fn collection_of(&self, entry_id: EntryId) -> QueryResult<Collection> {
        let entry = self
            .store
            .entries
            .get(entry_id)
            .ok_or_else(|| QueryError::EntryNotFound(entry_id.to_string()))?;
        self.collection(entry.collection_id)
    }

    fn touch(&mut self, entry_id: EntryId) {
        if let Some(entry) = self.store.entries.get_mut(entry_id) {
            entry.updated_at = Utc::now();
        }
    }

    /// Writes every recognized payload field; unknown keys drop silently
    fn write_payload(
        &mut self,
        entry_id: EntryId,
        collection: &Collection,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> QueryResult<()> {
        for field in &collection.fields {
            if let Some(raw) = payload.get(&field.name) {
                self.write_field(entry_id, field, None, raw)?;
            }
        }
        Ok(())
    }

    /// Dispatches one field write by shape: group, repeatable, or scalar
    fn write_field(
        &mut self,
        entry_id: EntryId,
        field: &FieldDefinition,
        instance: Option<GroupInstanceId>,
        raw: &serde_json::Value,
    ) -> QueryResult<()> {
        if field.field_type.is_group() {
            return self.write_group(entry_id, field, raw);
        }
        if field.options.repeatable {
            return self.write_repeatable(entry_id, field, instance, raw);
        }
        self.write_scalar(entry_id, field, instance, 0, raw)?;
        Ok(())
    }

    /// Writes one row per item, each encoded independently; skipped items
    /// do not leave order gaps
    fn write_repeatable(
        &mut self,
        entry_id: EntryId,
        field: &FieldDefinition,
        instance: Option<GroupInstanceId>,
        raw: &serde_json::Value,
    ) -> QueryResult<()> {
        let items: Vec<&serde_json::Value> = match raw {
            serde_json::Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let mut order = 0;
        for item in items {
            if self.write_scalar(entry_id, field, instance, order, item)? {
                order += 1;
            }
        }
        Ok(())
    }

    /// Normalizes group input to an ordered instance list, creates one
    /// instance per item, then recursively writes the children scoped to
    /// it. Non-object instance data is skipped.
    fn write_group(
        &mut self,
        entry_id: EntryId,
        field: &FieldDefinition,
        raw: &serde_json::Value,
    ) -> QueryResult<()> {
        let items: Vec<&serde_json::Value> = if field.options.repeatable {
            match raw {
                serde_json::Value::Array(items) => items.iter().collect(),
                other => vec![other],
            }
        } else {
            // Non-repeatable groups hold exactly one instance
            match raw {
                serde_json::Value::Array(items) => items.iter().take(1).collect(),
                other => vec![other],
            }
        };

        let mut order = 0;
        for item in items {
            let object = match item.as_object() {
                Some(object) => object,
                None => continue,
            };

            let instance = self.store.groups.create(entry_id, field.id, order);
            order += 1;

            for child in &field.options.children {
                if let Some(child_raw) = object.get(&child.name) {
                    self.write_field(entry_id, child, Some(instance), child_raw)?;
                }
            }
        }
        Ok(())
    }

    /// Encodes and stores one value row. Media/relation writes replace the
    /// owning link set wholesale. Returns whether a row was written.
    fn write_scalar(
        &mut self,
        entry_id: EntryId,
        field: &FieldDefinition,
        instance: Option<GroupInstanceId>,
        order: u32,
        raw: &serde_json::Value,
    ) -> QueryResult<bool> {
        let decision = {
            let store: &ContentStore = self.store;
            let resolver = IdResolver::new(store, store);
            encode(field, raw, &resolver)?
        };

        let value = match decision {
            WriteDecision::Skip => return Ok(false),
            WriteDecision::Write(value) => value,
        };

        let link_ids = match &value {
            Value::IdList(ids) => Some(ids.clone()),
            _ => None,
        };

        let value_id = self.store.values.insert(
            entry_id,
            field.id,
            field.field_type,
            instance,
            order,
            value.into_columns(),
        );

        if let Some(ids) = link_ids {
            match field.field_type {
                FieldType::Media => self.store.media_links.replace_links(value_id, &ids),
                FieldType::Relation => self.store.relation_links.replace_links(value_id, &ids),
                _ => {}
            }
        }

        Ok(true)
    }
}

/// Empty secrets are a no-op so updates can omit unchanged passwords
fn is_empty_secret(raw: &serde_json::Value) -> bool {
    raw.is_null() || raw.as_str().map(str::is_empty).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOptions;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(Collection::new(
                1,
                1,
                "articles",
                vec![
                    FieldDefinition::new(10, "title", FieldType::Text),
                    FieldDefinition::new(11, "tags", FieldType::Text).repeatable(),
                    FieldDefinition::new(12, "secret", FieldType::Password),
                    FieldDefinition::new(13, "sections", FieldType::Group).with_options(
                        FieldOptions {
                            repeatable: true,
                            children: vec![FieldDefinition::new(14, "heading", FieldType::Text)],
                            ..FieldOptions::default()
                        },
                    ),
                ],
            ))
            .unwrap();
        registry
    }

    fn payload(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_create_ignores_unknown_fields() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"title": "Hello", "bogus": 1})),
            )
            .unwrap();

        assert_eq!(store.values.for_entry(entry_id).len(), 1);
    }

    #[test]
    fn test_repeatable_rows_in_order() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"tags": ["x", "", "y"]})),
            )
            .unwrap();

        // The empty item is skipped without leaving an order gap
        let rows = store.values.for_field(entry_id, 11, None);
        let texts: Vec<_> = rows
            .iter()
            .map(|r| r.columns.text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["x", "y"]);
        let orders: Vec<u32> = rows.iter().map(|r| r.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_group_write_creates_scoped_children() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"sections": [
                    {"heading": "One"},
                    "not-an-object",
                    {"heading": "Two"}
                ]})),
            )
            .unwrap();

        let instances = store.groups.for_field(entry_id, 13);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].sort_order, 0);
        assert_eq!(instances[1].sort_order, 1);

        let first = store.values.for_field(entry_id, 14, Some(instances[0].id));
        assert_eq!(first[0].columns.text.as_deref(), Some("One"));
    }

    #[test]
    fn test_replace_removes_old_rows() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"title": "Old", "tags": ["a", "b"]})),
            )
            .unwrap();

        let mut writer = ContentWriter::new(&mut store, &registry);
        writer
            .replace(entry_id, &payload(json!({"title": "New"})))
            .unwrap();

        assert!(store.values.for_field(entry_id, 11, None).is_empty());
        let title = store.values.for_field(entry_id, 10, None);
        assert_eq!(title[0].columns.text.as_deref(), Some("New"));
    }

    #[test]
    fn test_patch_preserves_untouched_fields() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"title": "Old", "tags": ["a"]})),
            )
            .unwrap();

        let mut writer = ContentWriter::new(&mut store, &registry);
        writer
            .patch(entry_id, &payload(json!({"title": "New"})))
            .unwrap();

        let tags = store.values.for_field(entry_id, 11, None);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].columns.text.as_deref(), Some("a"));
    }

    #[test]
    fn test_patch_empty_password_preserves_hash() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(
                1,
                "en",
                EntryStatus::Draft,
                None,
                &payload(json!({"secret": "hunter2"})),
            )
            .unwrap();
        let stored = store.values.for_field(entry_id, 12, None)[0]
            .columns
            .text
            .clone();

        let mut writer = ContentWriter::new(&mut store, &registry);
        writer
            .patch(entry_id, &payload(json!({"secret": ""})))
            .unwrap();

        let after = store.values.for_field(entry_id, 12, None)[0]
            .columns
            .text
            .clone();
        assert_eq!(stored, after);
    }

    #[test]
    fn test_soft_and_hard_destroy() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let entry_id = writer
            .create(1, "en", EntryStatus::Draft, None, &payload(json!({"title": "x"})))
            .unwrap();

        let mut writer = ContentWriter::new(&mut store, &registry);
        writer.destroy(entry_id, false).unwrap();
        assert!(store.entries.get(entry_id).unwrap().is_deleted());

        let mut writer = ContentWriter::new(&mut store, &registry);
        writer.destroy(entry_id, true).unwrap();
        assert!(store.entries.get(entry_id).is_none());
        assert!(store.values.for_entry(entry_id).is_empty());
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let mut store = ContentStore::new();
        let registry = registry();
        let mut writer = ContentWriter::new(&mut store, &registry);

        let err = writer.create(99, "en", EntryStatus::Draft, None, &payload(json!({})));
        assert!(matches!(err, Err(QueryError::CollectionNotFound(99))));
    }
}
