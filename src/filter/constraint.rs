//! Compiled constraint tree and its evaluator
//!
//! The compiler output is a tree of constraints executable against the
//! content store. Sibling constraints combine with AND; `Or` nodes combine
//! their children disjunctively.
//!
//! Custom-field comparisons are best-effort by design: each value row is
//! tested against the column family implied by the declared type, a json
//! containment fallback, and additionally the numeric and boolean columns
//! when the operand's shape warrants. Any one match suffices.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::codec::{parse_datetime, parse_naive_date, truthy, CoreColumn};
use crate::schema::{CollectionId, FieldId, FieldType, SchemaRegistry};
use crate::store::{ContentEntry, ContentStore, FieldValue};

use super::ast::FilterOp;
use super::operators::{
    boolean_operand, cmp_ord, like_match, numeric_operand, operand_list, operand_string,
    two_bounds,
};

/// One executable constraint
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Direct comparison against a fixed entry attribute
    Core {
        column: CoreColumn,
        op: FilterOp,
        operand: Value,
    },
    /// Existence test: some value row of the field matches the comparison
    Value {
        field_id: FieldId,
        op: FilterOp,
        operand: Value,
    },
    /// Negated existence: no value row of the field equals the operand
    ValueAbsent { field_id: FieldId, operand: Value },
    /// Row-presence test for non-linking custom fields
    ValueNull { field_id: FieldId, negated: bool },
    /// Link-aware null test for media/relation fields: "null" also covers a
    /// row that owns zero links
    LinkNull {
        field_id: FieldId,
        field_type: FieldType,
        negated: bool,
    },
    /// Relation chain: some linked target entry satisfies the sub-filter
    Chain {
        field_id: FieldId,
        target: CollectionId,
        sub: ConstraintSet,
    },
    /// Disjunctive group, conjoined with its siblings as one unit
    Or(Vec<Constraint>),
}

/// AND-combined constraint collection
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pub constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Tests one entry against every constraint
    pub fn matches(
        &self,
        entry: &ContentEntry,
        store: &ContentStore,
        registry: &SchemaRegistry,
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.matches(entry, store, registry))
    }
}

impl Constraint {
    fn matches(&self, entry: &ContentEntry, store: &ContentStore, registry: &SchemaRegistry) -> bool {
        match self {
            Constraint::Core {
                column,
                op,
                operand,
            } => core_matches(entry, *column, *op, operand),
            Constraint::Value {
                field_id,
                op,
                operand,
            } => store
                .values
                .for_field_any_scope(entry.id, *field_id)
                .iter()
                .any(|row| row_matches(row, *op, operand)),
            Constraint::ValueAbsent { field_id, operand } => !store
                .values
                .for_field_any_scope(entry.id, *field_id)
                .iter()
                .any(|row| row_matches(row, FilterOp::Eq, operand)),
            Constraint::ValueNull { field_id, negated } => {
                let present = !store.values.for_field_any_scope(entry.id, *field_id).is_empty();
                present == *negated
            }
            Constraint::LinkNull {
                field_id,
                field_type,
                negated,
            } => {
                let links = match field_type {
                    FieldType::Media => &store.media_links,
                    _ => &store.relation_links,
                };
                let rows = store.values.for_field_any_scope(entry.id, *field_id);
                let linked = rows.iter().any(|row| links.count_for(row.id) > 0);
                linked == *negated
            }
            Constraint::Chain { field_id, sub, .. } => store
                .values
                .for_field_any_scope(entry.id, *field_id)
                .iter()
                .flat_map(|row| store.relation_links.links_for(row.id))
                .filter_map(|link| store.entries.get(link.target_id))
                .filter(|target| !target.is_deleted())
                .any(|target| sub.matches(target, store, registry)),
            Constraint::Or(children) => children
                .iter()
                .any(|c| c.matches(entry, store, registry)),
        }
    }
}

/// Core columns compare directly with the standard comparator mapping
fn core_matches(entry: &ContentEntry, column: CoreColumn, op: FilterOp, operand: &Value) -> bool {
    // Core columns are always populated
    match op {
        FilterOp::Null => return false,
        FilterOp::NotNull => return true,
        _ => {}
    }

    match column {
        CoreColumn::Id => number_scalar_matches(entry.id as f64, op, operand),
        CoreColumn::Uuid => string_scalar_matches(&entry.uuid.to_string(), op, operand),
        CoreColumn::Locale => string_scalar_matches(&entry.locale, op, operand),
        CoreColumn::Status => string_scalar_matches(entry.status.as_str(), op, operand),
        CoreColumn::CreatedAt => time_scalar_matches(entry.created_at, op, operand),
        CoreColumn::UpdatedAt => time_scalar_matches(entry.updated_at, op, operand),
    }
}

/// Best-effort row comparison: declared column, json containment, and shape
/// driven numeric/boolean fallbacks, combined disjunctively
fn row_matches(row: &FieldValue, op: FilterOp, operand: &Value) -> bool {
    typed_matches(row, op, operand)
        || json_containment_matches(row, op, operand)
        || numeric_fallback(row, op, operand)
        || boolean_fallback(row, op, operand)
}

/// Comparison against whichever column family the row populates
fn typed_matches(row: &FieldValue, op: FilterOp, operand: &Value) -> bool {
    if let Some(text) = &row.columns.text {
        return string_scalar_matches(text, op, operand);
    }
    if let Some(number) = row.columns.number {
        return number_scalar_matches(number, op, operand);
    }
    if let Some(boolean) = row.columns.boolean {
        return boolean_scalar_matches(boolean, op, operand);
    }
    if let Some(date) = row.columns.date {
        return date_scalar_matches(date, op, operand);
    }
    if let Some(datetime) = row.columns.datetime {
        return time_scalar_matches(datetime, op, operand);
    }
    if let Some(json) = &row.columns.json {
        return json_value_matches(json, op, operand);
    }
    false
}

fn string_scalar_matches(actual: &str, op: FilterOp, operand: &Value) -> bool {
    match op {
        FilterOp::Eq | FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            match operand_string(operand) {
                Some(expected) => cmp_ord(&actual.to_string(), &expected, op),
                None => false,
            }
        }
        FilterOp::Not => operand_string(operand)
            .map(|expected| actual != expected)
            .unwrap_or(false),
        FilterOp::Like => operand_string(operand)
            .map(|pattern| like_match(actual, &pattern))
            .unwrap_or(false),
        FilterOp::In => operand_list(operand)
            .iter()
            .any(|item| operand_string(item).as_deref() == Some(actual)),
        FilterOp::NotIn => !operand_list(operand)
            .iter()
            .any(|item| operand_string(item).as_deref() == Some(actual)),
        FilterOp::Between | FilterOp::NotBetween => {
            let Some((lo, hi)) = two_bounds(operand) else {
                return false;
            };
            let (Some(lo), Some(hi)) = (operand_string(&lo), operand_string(&hi)) else {
                return false;
            };
            let inside = lo.as_str() <= actual && actual <= hi.as_str();
            inside == (op == FilterOp::Between)
        }
        FilterOp::Null | FilterOp::NotNull => false,
    }
}

fn number_scalar_matches(actual: f64, op: FilterOp, operand: &Value) -> bool {
    match op {
        FilterOp::Eq | FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            match numeric_operand(operand) {
                Some(expected) => cmp_ord(&actual, &expected, op),
                None => false,
            }
        }
        FilterOp::Not => numeric_operand(operand)
            .map(|expected| actual != expected)
            .unwrap_or(false),
        FilterOp::In => operand_list(operand)
            .iter()
            .any(|item| numeric_operand(item) == Some(actual)),
        FilterOp::NotIn => !operand_list(operand)
            .iter()
            .any(|item| numeric_operand(item) == Some(actual)),
        FilterOp::Between | FilterOp::NotBetween => {
            let Some((lo, hi)) = two_bounds(operand) else {
                return false;
            };
            let (Some(lo), Some(hi)) = (numeric_operand(&lo), numeric_operand(&hi)) else {
                return false;
            };
            let inside = lo <= actual && actual <= hi;
            inside == (op == FilterOp::Between)
        }
        _ => false,
    }
}

fn boolean_scalar_matches(actual: bool, op: FilterOp, operand: &Value) -> bool {
    match op {
        FilterOp::Eq => truthy(operand) == actual,
        FilterOp::Not => truthy(operand) != actual,
        FilterOp::In => operand_list(operand)
            .iter()
            .any(|item| boolean_operand(item) == Some(actual)),
        _ => false,
    }
}

fn date_scalar_matches(actual: NaiveDate, op: FilterOp, operand: &Value) -> bool {
    let parse = |v: &Value| v.as_str().and_then(parse_naive_date);
    match op {
        FilterOp::Eq | FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            match parse(operand) {
                Some(expected) => cmp_ord(&actual, &expected, op),
                None => false,
            }
        }
        FilterOp::Not => parse(operand).map(|d| actual != d).unwrap_or(false),
        FilterOp::In => operand_list(operand).iter().any(|i| parse(i) == Some(actual)),
        FilterOp::NotIn => !operand_list(operand).iter().any(|i| parse(i) == Some(actual)),
        FilterOp::Between | FilterOp::NotBetween => {
            let Some((lo, hi)) = two_bounds(operand) else {
                return false;
            };
            let (Some(lo), Some(hi)) = (parse(&lo), parse(&hi)) else {
                return false;
            };
            let inside = lo <= actual && actual <= hi;
            inside == (op == FilterOp::Between)
        }
        _ => false,
    }
}

fn time_scalar_matches(actual: DateTime<Utc>, op: FilterOp, operand: &Value) -> bool {
    let parse = |v: &Value| {
        v.as_str().and_then(|s| {
            parse_datetime(s).or_else(|| {
                parse_naive_date(s)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|n| n.and_utc())
            })
        })
    };
    match op {
        FilterOp::Eq | FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            match parse(operand) {
                Some(expected) => cmp_ord(&actual, &expected, op),
                None => false,
            }
        }
        FilterOp::Not => parse(operand).map(|t| actual != t).unwrap_or(false),
        FilterOp::In => operand_list(operand).iter().any(|i| parse(i) == Some(actual)),
        FilterOp::NotIn => !operand_list(operand).iter().any(|i| parse(i) == Some(actual)),
        FilterOp::Between | FilterOp::NotBetween => {
            let Some((lo, hi)) = two_bounds(operand) else {
                return false;
            };
            let (Some(lo), Some(hi)) = (parse(&lo), parse(&hi)) else {
                return false;
            };
            let inside = lo <= actual && actual <= hi;
            inside == (op == FilterOp::Between)
        }
        _ => false,
    }
}

/// Equality-family comparison against a json column value
fn json_value_matches(json: &Value, op: FilterOp, operand: &Value) -> bool {
    match op {
        FilterOp::Eq => json_contains(json, operand),
        FilterOp::Not => !json_contains(json, operand),
        FilterOp::Like => match (json, operand_string(operand)) {
            (Value::Array(items), Some(pattern)) => items
                .iter()
                .filter_map(|i| i.as_str())
                .any(|s| like_match(s, &pattern)),
            (Value::String(s), Some(pattern)) => like_match(s, &pattern),
            _ => false,
        },
        FilterOp::In => operand_list(operand)
            .iter()
            .any(|item| json_contains(json, item)),
        FilterOp::NotIn => !operand_list(operand)
            .iter()
            .any(|item| json_contains(json, item)),
        _ => false,
    }
}

/// Fallback containment test against the json column, applied to every
/// custom-field comparison so stored-vs-query type drift still matches
fn json_containment_matches(row: &FieldValue, op: FilterOp, operand: &Value) -> bool {
    match &row.columns.json {
        Some(json) => match op {
            FilterOp::Eq | FilterOp::Like | FilterOp::In | FilterOp::NotIn => {
                json_value_matches(json, op, operand)
            }
            _ => false,
        },
        None => false,
    }
}

/// Containment: exact value equality, scalar string-form equality, or array
/// membership by either
fn json_contains(json: &Value, operand: &Value) -> bool {
    if loose_eq(json, operand) {
        return true;
    }
    match json {
        Value::Array(items) => items.iter().any(|item| loose_eq(item, operand)),
        _ => false,
    }
}

/// Scalar equality tolerating string/number/bool form differences
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (operand_string(a), operand_string(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Numeric-looking operands additionally compare against the numeric column
fn numeric_fallback(row: &FieldValue, op: FilterOp, operand: &Value) -> bool {
    match (row.columns.number, numeric_operand(operand)) {
        (Some(actual), Some(_)) => number_scalar_matches(actual, op, operand),
        _ => false,
    }
}

/// Boolean-coercible operands additionally compare against the boolean column
fn boolean_fallback(row: &FieldValue, op: FilterOp, operand: &Value) -> bool {
    match (row.columns.boolean, boolean_operand(operand)) {
        (Some(actual), Some(expected)) => match op {
            FilterOp::Eq => actual == expected,
            FilterOp::Not => actual != expected,
            _ => false,
        },
        _ => false,
    }
}
