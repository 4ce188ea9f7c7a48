//! Read-model assembly
//!
//! An entry document exposes the core columns plus a JSON field map: scalars
//! decoded by the codec, repeatables as arrays in sort order, groups as
//! instance objects in instance order, media/relation values as their
//! resolved id lists.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::codec::decode;
use crate::schema::{Collection, FieldDefinition, FieldType};
use crate::store::{ContentEntry, ContentStore, EntryId, EntryStatus, GroupInstanceId};

/// One entry in caller-facing shape
#[derive(Debug, Clone, Serialize)]
pub struct EntryDocument {
    pub id: EntryId,
    pub uuid: Uuid,
    pub locale: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_group: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Decoded field values keyed by field name
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl EntryDocument {
    /// Assembles the read model for one entry
    pub fn assemble(entry: &ContentEntry, collection: &Collection, store: &ContentStore) -> Self {
        let mut fields = serde_json::Map::new();

        for field in &collection.fields {
            let value = match field.field_type {
                FieldType::Group => group_json(entry.id, field, store),
                _ => field_json(entry.id, field, None, store),
            };
            fields.insert(field.name.clone(), value);
        }

        Self {
            id: entry.id,
            uuid: entry.uuid,
            locale: entry.locale.clone(),
            status: entry.status,
            translation_group: entry.translation_group,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            fields,
        }
    }

    /// Convenience accessor for one decoded field
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// Decodes a non-group field: repeatables as an array in sort order, plain
/// fields as the first row's value or null
fn field_json(
    entry_id: EntryId,
    field: &FieldDefinition,
    instance: Option<GroupInstanceId>,
    store: &ContentStore,
) -> serde_json::Value {
    let rows = store.values.for_field(entry_id, field.id, instance);

    if field.options.repeatable {
        serde_json::Value::Array(rows.iter().map(|row| decode(field, &row.columns)).collect())
    } else {
        match rows.first() {
            Some(row) => decode(field, &row.columns),
            None => serde_json::Value::Null,
        }
    }
}

/// Groups expose instance objects: an array for repeatable groups, the
/// single instance object (or null) otherwise
fn group_json(entry_id: EntryId, field: &FieldDefinition, store: &ContentStore) -> serde_json::Value {
    let instances = store.groups.for_field(entry_id, field.id);

    let objects: Vec<serde_json::Value> = instances
        .iter()
        .map(|instance| {
            let mut object = serde_json::Map::new();
            for child in &field.options.children {
                object.insert(
                    child.name.clone(),
                    field_json(entry_id, child, Some(instance.id), store),
                );
            }
            serde_json::Value::Object(object)
        })
        .collect();

    if field.options.repeatable {
        serde_json::Value::Array(objects)
    } else {
        objects.into_iter().next().unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Value;
    use crate::schema::{FieldOptions, FieldType};

    #[test]
    fn test_assemble_plain_and_repeatable() {
        let mut store = ContentStore::new();
        let entry_id = store.entries.create(1, 1, "en", EntryStatus::Published, None);

        let title = FieldDefinition::new(10, "title", FieldType::Text);
        let tags = FieldDefinition::new(11, "tags", FieldType::Text).repeatable();
        let collection = Collection::new(1, 1, "articles", vec![title, tags]);

        store.values.insert(
            entry_id,
            10,
            FieldType::Text,
            None,
            0,
            Value::Text("Hello".into()).into_columns(),
        );
        for (i, tag) in ["a", "b"].iter().enumerate() {
            store.values.insert(
                entry_id,
                11,
                FieldType::Text,
                None,
                i as u32,
                Value::Text((*tag).into()).into_columns(),
            );
        }

        let entry = store.entries.get(entry_id).unwrap();
        let doc = EntryDocument::assemble(entry, &collection, &store);

        assert_eq!(doc.field("title"), Some(&serde_json::json!("Hello")));
        assert_eq!(doc.field("tags"), Some(&serde_json::json!(["a", "b"])));
    }

    #[test]
    fn test_assemble_group_instances() {
        let mut store = ContentStore::new();
        let entry_id = store.entries.create(1, 1, "en", EntryStatus::Published, None);

        let group = FieldDefinition::new(10, "sections", FieldType::Group)
            .repeatable()
            .with_options(FieldOptions {
                repeatable: true,
                children: vec![FieldDefinition::new(11, "heading", FieldType::Text)],
                ..FieldOptions::default()
            });
        let collection = Collection::new(1, 1, "pages", vec![group]);

        for (i, heading) in ["Intro", "Body"].iter().enumerate() {
            let instance = store.groups.create(entry_id, 10, i as u32);
            store.values.insert(
                entry_id,
                11,
                FieldType::Text,
                Some(instance),
                0,
                Value::Text((*heading).into()).into_columns(),
            );
        }

        let entry = store.entries.get(entry_id).unwrap();
        let doc = EntryDocument::assemble(entry, &collection, &store);

        assert_eq!(
            doc.field("sections"),
            Some(&serde_json::json!([
                {"heading": "Intro"},
                {"heading": "Body"}
            ]))
        );
    }

    #[test]
    fn test_missing_field_decodes_null() {
        let mut store = ContentStore::new();
        let entry_id = store.entries.create(1, 1, "en", EntryStatus::Published, None);
        let collection = Collection::new(
            1,
            1,
            "articles",
            vec![FieldDefinition::new(10, "title", FieldType::Text)],
        );

        let entry = store.entries.get(entry_id).unwrap();
        let doc = EntryDocument::assemble(entry, &collection, &store);
        assert_eq!(doc.field("title"), Some(&serde_json::Value::Null));
    }
}
