//! Typed value representation
//!
//! Decoded values are always one of these variants, never an untyped blob.
//! The write path receives an explicit skip/write decision from the codec so
//! the skip-on-empty policy stays auditable.

use chrono::{DateTime, NaiveDate, Utc};

use super::column::ValueColumns;

/// A typed stored value, one variant per column family
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Date bounds; end is None for single-mode and open-ended ranges
    Date {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    /// Datetime bounds; end is None for single-mode and open-ended ranges
    DateTime {
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    },
    Json(serde_json::Value),
    /// Resolved numeric identifiers for media/relation values
    IdList(Vec<i64>),
    /// Richtext keeps legacy HTML and structured content side by side
    RichText {
        html: Option<String>,
        structured: Option<serde_json::Value>,
    },
}

impl Value {
    /// Spreads the value into its physical columns
    pub fn into_columns(self) -> ValueColumns {
        let mut cols = ValueColumns::default();
        match self {
            Value::Number(n) => cols.number = Some(n),
            Value::Bool(b) => cols.boolean = Some(b),
            Value::Text(s) => cols.text = Some(s),
            Value::Date { start, end } => {
                cols.date = Some(start);
                cols.date_end = end;
            }
            Value::DateTime { start, end } => {
                cols.datetime = Some(start);
                cols.datetime_end = end;
            }
            Value::Json(v) => cols.json = Some(v),
            Value::IdList(ids) => {
                cols.json = Some(serde_json::Value::Array(
                    ids.into_iter().map(serde_json::Value::from).collect(),
                ));
            }
            Value::RichText { html, structured } => {
                cols.text = html;
                cols.json = structured;
            }
        }
        cols
    }
}

/// Outcome of encoding one raw input
#[derive(Debug, Clone, PartialEq)]
pub enum WriteDecision {
    /// Nothing to store; no row is written and existing rows stay untouched
    /// where the write path preserves them (password)
    Skip,
    /// Store this value
    Write(Value),
}

impl WriteDecision {
    /// Returns true when the input was skipped
    pub fn is_skip(&self) -> bool {
        matches!(self, WriteDecision::Skip)
    }

    /// Returns the value to write, if any
    pub fn written(self) -> Option<Value> {
        match self {
            WriteDecision::Skip => None,
            WriteDecision::Write(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_list_lands_in_json_column() {
        let cols = Value::IdList(vec![3, 1]).into_columns();
        assert_eq!(cols.json, Some(json!([3, 1])));
        assert!(cols.text.is_none());
    }

    #[test]
    fn test_richtext_may_fill_two_columns() {
        let cols = Value::RichText {
            html: Some("<p>hi</p>".into()),
            structured: Some(json!({"blocks": []})),
        }
        .into_columns();
        assert!(cols.text.is_some());
        assert!(cols.json.is_some());
    }

    #[test]
    fn test_single_column_for_scalars() {
        let cols = Value::Number(4.5).into_columns();
        assert_eq!(cols.number, Some(4.5));
        assert!(cols.json.is_none());
        assert!(cols.text.is_none());

        let cols = Value::Bool(true).into_columns();
        assert_eq!(cols.boolean, Some(true));
    }

    #[test]
    fn test_write_decision() {
        assert!(WriteDecision::Skip.is_skip());
        assert!(WriteDecision::Skip.written().is_none());
        assert_eq!(
            WriteDecision::Write(Value::Number(1.0)).written(),
            Some(Value::Number(1.0))
        );
    }
}
