//! Collection schema registry
//!
//! Read-only view of the managed schemas. Registration enforces the
//! structural invariants the rest of the core relies on:
//! - only group fields own children
//! - children are never themselves groups
//! - field names are unique within their scope
//! - relation fields name a target collection

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Collection, CollectionId, FieldDefinition, FieldType};

/// Registry of collection schemas, keyed by collection id.
///
/// Schema management (create/edit/import) is an external collaborator; the
/// core only reads from this registry.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    collections: HashMap<CollectionId, Collection>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection after checking structural invariants
    pub fn register(&mut self, collection: Collection) -> SchemaResult<()> {
        if self.collections.contains_key(&collection.id) {
            return Err(SchemaError::DuplicateCollection(collection.id));
        }
        validate_fields(&collection.name, &collection.fields, false)?;
        self.collections.insert(collection.id, collection);
        Ok(())
    }

    /// Looks up a collection by id
    pub fn collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.get(&id)
    }

    /// Looks up a top-level field by collection id + name
    pub fn field(&self, collection: CollectionId, name: &str) -> Option<&FieldDefinition> {
        self.collection(collection)?.field(name)
    }

    /// Iterates over registered collections
    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }
}

/// Checks one field list for duplicate names, illegal children, and missing
/// relation targets. `nested` is true when validating inside a group.
fn validate_fields(
    collection_name: &str,
    fields: &[FieldDefinition],
    nested: bool,
) -> SchemaResult<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        if seen.contains(&field.name.as_str()) {
            return Err(SchemaError::DuplicateField(
                field.name.clone(),
                collection_name.to_string(),
            ));
        }
        seen.push(&field.name);

        match field.field_type {
            FieldType::Group => {
                if nested {
                    // Caller reports the parent; find it here for the message
                    return Err(SchemaError::NestedGroup(
                        collection_name.to_string(),
                        field.name.clone(),
                    ));
                }
                validate_fields(&field.name, &field.options.children, true)?;
            }
            FieldType::Relation => {
                if field.options.relation_collection.is_none() {
                    return Err(SchemaError::MissingRelationTarget(field.name.clone()));
                }
                if !field.options.children.is_empty() {
                    return Err(SchemaError::ChildrenOnNonGroup(field.name.clone()));
                }
            }
            _ => {
                if !field.options.children.is_empty() {
                    return Err(SchemaError::ChildrenOnNonGroup(field.name.clone()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::FieldOptions;

    fn text_field(id: i64, name: &str) -> FieldDefinition {
        FieldDefinition::new(id, name, FieldType::Text)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(Collection::new(1, 1, "articles", vec![text_field(10, "title")]))
            .unwrap();

        assert!(registry.collection(1).is_some());
        assert_eq!(registry.field(1, "title").map(|f| f.id), Some(10));
        assert!(registry.field(1, "missing").is_none());
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(Collection::new(1, 1, "articles", vec![]))
            .unwrap();
        let err = registry.register(Collection::new(1, 1, "articles", vec![]));
        assert!(matches!(err, Err(SchemaError::DuplicateCollection(1))));
    }

    #[test]
    fn test_nested_group_rejected() {
        let inner = FieldDefinition::new(3, "inner", FieldType::Group);
        let outer = FieldDefinition::new(2, "outer", FieldType::Group).with_options(FieldOptions {
            children: vec![inner],
            ..FieldOptions::default()
        });

        let mut registry = SchemaRegistry::new();
        let err = registry.register(Collection::new(1, 1, "articles", vec![outer]));
        assert!(matches!(err, Err(SchemaError::NestedGroup(_, _))));
    }

    #[test]
    fn test_children_on_non_group_rejected() {
        let bad = FieldDefinition::new(2, "title", FieldType::Text).with_options(FieldOptions {
            children: vec![text_field(3, "sub")],
            ..FieldOptions::default()
        });

        let mut registry = SchemaRegistry::new();
        let err = registry.register(Collection::new(1, 1, "articles", vec![bad]));
        assert!(matches!(err, Err(SchemaError::ChildrenOnNonGroup(_))));
    }

    #[test]
    fn test_relation_requires_target() {
        let rel = FieldDefinition::new(2, "author", FieldType::Relation);
        let mut registry = SchemaRegistry::new();
        let err = registry.register(Collection::new(1, 1, "articles", vec![rel]));
        assert!(matches!(err, Err(SchemaError::MissingRelationTarget(_))));
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let mut registry = SchemaRegistry::new();
        let err = registry.register(Collection::new(
            1,
            1,
            "articles",
            vec![text_field(10, "title"), text_field(11, "title")],
        ));
        assert!(matches!(err, Err(SchemaError::DuplicateField(_, _))));
    }
}
