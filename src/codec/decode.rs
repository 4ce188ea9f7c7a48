//! Stored columns → raw value decoding
//!
//! The inverse of encoding, minus the two documented exceptions: password
//! decodes to its hash (one-way) and richtext prefers the structured form
//! when both representations are present.

use chrono::SecondsFormat;

use crate::schema::{FieldDefinition, FieldType};

use super::column::ValueColumns;
use super::encode::RANGE_DELIMITER;

/// Decodes one stored row back into its caller-facing JSON shape.
///
/// Missing or never-populated columns decode to null.
pub fn decode(field: &FieldDefinition, columns: &ValueColumns) -> serde_json::Value {
    match field.field_type {
        FieldType::Number => match columns.number {
            Some(n) => number_json(n),
            None => serde_json::Value::Null,
        },
        FieldType::Boolean => match columns.boolean {
            Some(b) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
        },
        FieldType::Date => decode_date(field, columns),
        FieldType::Enumeration | FieldType::Json => {
            columns.json.clone().unwrap_or(serde_json::Value::Null)
        }
        FieldType::Media | FieldType::Relation => decode_links(field, columns),
        FieldType::Password => match &columns.text {
            Some(hash) => serde_json::Value::String(hash.clone()),
            None => serde_json::Value::Null,
        },
        FieldType::Richtext => {
            if let Some(structured) = &columns.json {
                structured.clone()
            } else if let Some(html) = &columns.text {
                serde_json::Value::String(html.clone())
            } else {
                serde_json::Value::Null
            }
        }
        FieldType::Text
        | FieldType::Longtext
        | FieldType::Slug
        | FieldType::Email
        | FieldType::Color
        | FieldType::Time => match &columns.text {
            Some(s) => serde_json::Value::String(s.clone()),
            None => serde_json::Value::Null,
        },
        // Groups decode through instance assembly, never through a value row
        FieldType::Group => serde_json::Value::Null,
    }
}

/// Whole numbers decode as integers so round-trips preserve the input shape
fn number_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Value::from(n)
    }
}

fn decode_date(field: &FieldDefinition, columns: &ValueColumns) -> serde_json::Value {
    if field.options.include_time {
        let start = match columns.datetime {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => return serde_json::Value::Null,
        };
        match columns.datetime_end {
            Some(end) => serde_json::Value::String(format!(
                "{}{}{}",
                start,
                RANGE_DELIMITER,
                end.to_rfc3339_opts(SecondsFormat::Secs, true)
            )),
            None => serde_json::Value::String(start),
        }
    } else {
        let start = match columns.date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => return serde_json::Value::Null,
        };
        match columns.date_end {
            Some(end) => serde_json::Value::String(format!(
                "{}{}{}",
                start,
                RANGE_DELIMITER,
                end.format("%Y-%m-%d")
            )),
            None => serde_json::Value::String(start),
        }
    }
}

/// Media/relation values expose the cached id list; single-cardinality
/// fields flatten to one id or null
fn decode_links(field: &FieldDefinition, columns: &ValueColumns) -> serde_json::Value {
    let ids = columns.json.clone().unwrap_or(serde_json::Value::Null);
    if field.options.multiple {
        ids
    } else {
        match ids {
            serde_json::Value::Array(items) => {
                items.into_iter().next().unwrap_or(serde_json::Value::Null)
            }
            other => other,
        }
    }
}
