//! Dynamic sort planning
//!
//! A sort spec is a comma-separated list of `field[:dir]` tokens, direction
//! defaulting to ascending. Core columns order directly; custom fields order
//! on the value column selected by their declared type. Null values sort
//! last for both directions: the null flag is the primary ordering key
//! (ascending always), the value the secondary key.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::codec::CoreColumn;
use crate::schema::{CollectionId, FieldId, FieldType, SchemaRegistry};
use crate::store::{ContentEntry, ContentStore};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Value column a custom-field sort reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Number,
    Boolean,
    Date,
    DateTime,
    Text,
}

/// What one sort key orders on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    /// Fixed entry attribute
    Core(CoreColumn),
    /// Value-column ordering for one custom field
    Custom { field_id: FieldId, column: SortColumn },
}

/// One resolved sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub target: SortTarget,
    pub direction: SortDirection,
}

/// Ordered list of sort keys, applied in sequence
#[derive(Debug, Clone, Default)]
pub struct SortPlan {
    pub keys: Vec<SortKey>,
}

impl SortPlan {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Resolves a sort spec against one collection's schema.
///
/// Unknown field tokens drop (fail-open), matching filter resolution.
pub fn plan(spec: &str, registry: &SchemaRegistry, collection: CollectionId) -> SortPlan {
    let mut keys = Vec::new();

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (name, direction) = match token.split_once(':') {
            Some((name, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "desc" => SortDirection::Desc,
                    _ => SortDirection::Asc,
                };
                (name.trim(), direction)
            }
            None => (token, SortDirection::Asc),
        };

        if let Some(column) = CoreColumn::from_name(name) {
            keys.push(SortKey {
                target: SortTarget::Core(column),
                direction,
            });
            continue;
        }

        let definition = match registry.field(collection, name) {
            Some(def) => def,
            None => continue,
        };

        let column = match definition.field_type {
            FieldType::Number => SortColumn::Number,
            FieldType::Boolean => SortColumn::Boolean,
            FieldType::Date => {
                if definition.options.include_time {
                    SortColumn::DateTime
                } else {
                    SortColumn::Date
                }
            }
            // Groups have no value column; token drops
            FieldType::Group => continue,
            FieldType::Text
            | FieldType::Longtext
            | FieldType::Richtext
            | FieldType::Slug
            | FieldType::Email
            | FieldType::Password
            | FieldType::Color
            | FieldType::Time
            | FieldType::Enumeration
            | FieldType::Json
            | FieldType::Media
            | FieldType::Relation => SortColumn::Text,
        };

        keys.push(SortKey {
            target: SortTarget::Custom {
                field_id: definition.id,
                column,
            },
            direction,
        });
    }

    SortPlan { keys }
}

/// Comparable value extracted for one sort key
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Int(i64),
    Number(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // Mixed variants only occur on schema drift; keep input order
            _ => Ordering::Equal,
        }
    }
}

/// Sorts materialized entries according to the plan.
///
/// The sort is stable, so equal keys preserve base-scope order.
pub fn sort_entries(entries: &mut [&ContentEntry], plan: &SortPlan, store: &ContentStore) {
    if plan.is_empty() {
        return;
    }

    entries.sort_by(|a, b| {
        for key in &plan.keys {
            let a_val = key_for(a, key.target, store);
            let b_val = key_for(b, key.target, store);

            // Null flag first, ascending regardless of direction: nulls
            // always land after every populated value
            let ordering = match (&a_val, &b_val) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a_val), Some(b_val)) => {
                    let ordering = a_val.compare(b_val);
                    match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Extracts the sort value of one entry for one target.
///
/// Custom fields read the first directly-owned row of the field; a missing
/// row or unpopulated column is null.
fn key_for(entry: &ContentEntry, target: SortTarget, store: &ContentStore) -> Option<SortValue> {
    match target {
        SortTarget::Core(column) => Some(match column {
            CoreColumn::Id => SortValue::Int(entry.id),
            CoreColumn::Uuid => SortValue::Text(entry.uuid.to_string()),
            CoreColumn::Locale => SortValue::Text(entry.locale.clone()),
            CoreColumn::Status => SortValue::Text(entry.status.as_str().to_string()),
            CoreColumn::CreatedAt => SortValue::Time(entry.created_at),
            CoreColumn::UpdatedAt => SortValue::Time(entry.updated_at),
        }),
        SortTarget::Custom { field_id, column } => {
            let rows = store.values.for_field(entry.id, field_id, None);
            let row = rows.first()?;
            match column {
                SortColumn::Number => row.columns.number.map(SortValue::Number),
                SortColumn::Boolean => row.columns.boolean.map(SortValue::Bool),
                SortColumn::Date => row
                    .columns
                    .date
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|n| SortValue::Time(n.and_utc())),
                SortColumn::DateTime => row.columns.datetime.map(SortValue::Time),
                SortColumn::Text => row.columns.text.clone().map(SortValue::Text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Value;
    use crate::schema::{Collection, FieldDefinition};
    use crate::store::EntryStatus;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(Collection::new(
                1,
                1,
                "articles",
                vec![
                    FieldDefinition::new(10, "score", FieldType::Number),
                    FieldDefinition::new(11, "title", FieldType::Text),
                ],
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_plan_tokens() {
        let plan = plan("score:desc, title", &registry(), 1);
        assert_eq!(plan.keys.len(), 2);
        assert_eq!(plan.keys[0].direction, SortDirection::Desc);
        assert_eq!(
            plan.keys[0].target,
            SortTarget::Custom {
                field_id: 10,
                column: SortColumn::Number
            }
        );
        assert_eq!(plan.keys[1].direction, SortDirection::Asc);
    }

    #[test]
    fn test_core_token_resolves_directly() {
        let p = plan("created_at:desc", &registry(), 1);
        assert_eq!(p.keys[0].target, SortTarget::Core(CoreColumn::CreatedAt));
    }

    #[test]
    fn test_unknown_token_dropped() {
        let p = plan("bogus,score", &registry(), 1);
        assert_eq!(p.keys.len(), 1);
    }

    fn seed_store(scores: &[Option<f64>]) -> (ContentStore, Vec<i64>) {
        let mut store = ContentStore::new();
        let mut ids = Vec::new();
        for score in scores {
            let id = store.entries.create(1, 1, "en", EntryStatus::Published, None);
            if let Some(score) = score {
                store.values.insert(
                    id,
                    10,
                    FieldType::Number,
                    None,
                    0,
                    Value::Number(*score).into_columns(),
                );
            }
            ids.push(id);
        }
        (store, ids)
    }

    #[test]
    fn test_nulls_last_ascending_and_descending() {
        let (store, ids) = seed_store(&[Some(5.0), None, Some(1.0), None, Some(3.0)]);
        let entries: Vec<&ContentEntry> = ids.iter().map(|id| store.entries.get(*id).unwrap()).collect();

        let asc = plan("score", &registry(), 1);
        let mut sorted = entries.clone();
        sort_entries(&mut sorted, &asc, &store);
        let scores: Vec<Option<f64>> = sorted
            .iter()
            .map(|e| {
                store
                    .values
                    .for_field(e.id, 10, None)
                    .first()
                    .and_then(|r| r.columns.number)
            })
            .collect();
        assert_eq!(scores, vec![Some(1.0), Some(3.0), Some(5.0), None, None]);

        let desc = plan("score:desc", &registry(), 1);
        let mut sorted = entries.clone();
        sort_entries(&mut sorted, &desc, &store);
        let scores: Vec<Option<f64>> = sorted
            .iter()
            .map(|e| {
                store
                    .values
                    .for_field(e.id, 10, None)
                    .first()
                    .and_then(|r| r.columns.number)
            })
            .collect();
        assert_eq!(scores, vec![Some(5.0), Some(3.0), Some(1.0), None, None]);
    }

    #[test]
    fn test_multi_key_tiebreak() {
        let mut store = ContentStore::new();
        let mut make = |score: f64, title: &str| {
            let id = store.entries.create(1, 1, "en", EntryStatus::Published, None);
            store.values.insert(
                id,
                10,
                FieldType::Number,
                None,
                0,
                Value::Number(score).into_columns(),
            );
            store.values.insert(
                id,
                11,
                FieldType::Text,
                None,
                0,
                Value::Text(title.into()).into_columns(),
            );
            id
        };
        let a = make(1.0, "zebra");
        let b = make(1.0, "apple");
        let c = make(0.0, "mango");

        let entries_ids = [a, b, c];
        let mut entries: Vec<&ContentEntry> = entries_ids
            .iter()
            .map(|id| store.entries.get(*id).unwrap())
            .collect();

        let p = plan("score,title", &registry(), 1);
        sort_entries(&mut entries, &p, &store);

        let order: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![c, b, a]);
    }
}
