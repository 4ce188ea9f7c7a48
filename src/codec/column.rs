//! Physical column mapping
//!
//! Every stored value occupies exactly one column family out of the eight
//! physical columns {text, number, boolean, date, date_end, datetime,
//! datetime_end, json}. Richtext is the single exception: it may fill the
//! text column (legacy HTML) and the json column (structured content) at the
//! same time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldOptions, FieldType};

/// Column family a field type stores into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    /// text column
    Text,
    /// numeric column
    Number,
    /// boolean column
    Boolean,
    /// date column, optionally date_end for ranges
    Date { range: bool },
    /// datetime column, optionally datetime_end for ranges
    DateTime { range: bool },
    /// json column
    Json,
}

/// Resolves the column family for a declared type.
///
/// Group fields own no column of their own (their children do), so they map
/// to None.
pub fn column_for(field_type: FieldType, options: &FieldOptions) -> Option<ColumnFamily> {
    use crate::schema::DateMode;

    match field_type {
        FieldType::Number => Some(ColumnFamily::Number),
        FieldType::Boolean => Some(ColumnFamily::Boolean),
        FieldType::Date => {
            let range = options.date_mode == DateMode::Range;
            if options.include_time {
                Some(ColumnFamily::DateTime { range })
            } else {
                Some(ColumnFamily::Date { range })
            }
        }
        FieldType::Enumeration | FieldType::Json | FieldType::Media | FieldType::Relation => {
            Some(ColumnFamily::Json)
        }
        FieldType::Richtext => Some(ColumnFamily::Json),
        FieldType::Password
        | FieldType::Text
        | FieldType::Longtext
        | FieldType::Slug
        | FieldType::Email
        | FieldType::Color
        | FieldType::Time => Some(ColumnFamily::Text),
        FieldType::Group => None,
    }
}

/// The eight physical value columns of one stored row.
///
/// Invariant: at most one family is populated, except richtext which may
/// populate text and json together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueColumns {
    pub text: Option<String>,
    pub number: Option<f64>,
    pub boolean: Option<bool>,
    pub date: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub datetime: Option<DateTime<Utc>>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub json: Option<serde_json::Value>,
}

impl ValueColumns {
    /// Returns true when no column is populated
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.number.is_none()
            && self.boolean.is_none()
            && self.date.is_none()
            && self.date_end.is_none()
            && self.datetime.is_none()
            && self.datetime_end.is_none()
            && self.json.is_none()
    }
}

/// Fixed entry attributes addressable by filters and sorts without a value
/// row lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreColumn {
    Id,
    Uuid,
    Locale,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl CoreColumn {
    /// Parses a core column name; custom field names yield None
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(CoreColumn::Id),
            "uuid" => Some(CoreColumn::Uuid),
            "locale" => Some(CoreColumn::Locale),
            "status" => Some(CoreColumn::Status),
            "created_at" => Some(CoreColumn::CreatedAt),
            "updated_at" => Some(CoreColumn::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoreColumn::Id => "id",
            CoreColumn::Uuid => "uuid",
            CoreColumn::Locale => "locale",
            CoreColumn::Status => "status",
            CoreColumn::CreatedAt => "created_at",
            CoreColumn::UpdatedAt => "updated_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DateMode;

    #[test]
    fn test_column_table_matches_contract() {
        let opts = FieldOptions::default();
        assert_eq!(
            column_for(FieldType::Number, &opts),
            Some(ColumnFamily::Number)
        );
        assert_eq!(
            column_for(FieldType::Boolean, &opts),
            Some(ColumnFamily::Boolean)
        );
        assert_eq!(
            column_for(FieldType::Enumeration, &opts),
            Some(ColumnFamily::Json)
        );
        assert_eq!(column_for(FieldType::Json, &opts), Some(ColumnFamily::Json));
        assert_eq!(
            column_for(FieldType::Media, &opts),
            Some(ColumnFamily::Json)
        );
        assert_eq!(
            column_for(FieldType::Relation, &opts),
            Some(ColumnFamily::Json)
        );
        assert_eq!(
            column_for(FieldType::Password, &opts),
            Some(ColumnFamily::Text)
        );
        assert_eq!(column_for(FieldType::Time, &opts), Some(ColumnFamily::Text));
        assert_eq!(column_for(FieldType::Group, &opts), None);
    }

    #[test]
    fn test_date_columns_follow_options() {
        let mut opts = FieldOptions::default();
        assert_eq!(
            column_for(FieldType::Date, &opts),
            Some(ColumnFamily::Date { range: false })
        );

        opts.include_time = true;
        assert_eq!(
            column_for(FieldType::Date, &opts),
            Some(ColumnFamily::DateTime { range: false })
        );

        opts.date_mode = DateMode::Range;
        assert_eq!(
            column_for(FieldType::Date, &opts),
            Some(ColumnFamily::DateTime { range: true })
        );
    }

    #[test]
    fn test_core_column_names() {
        assert_eq!(CoreColumn::from_name("id"), Some(CoreColumn::Id));
        assert_eq!(CoreColumn::from_name("status"), Some(CoreColumn::Status));
        assert_eq!(CoreColumn::from_name("title"), None);
        assert_eq!(CoreColumn::CreatedAt.as_str(), "created_at");
    }

    #[test]
    fn test_empty_columns() {
        let mut cols = ValueColumns::default();
        assert!(cols.is_empty());
        cols.number = Some(1.0);
        assert!(!cols.is_empty());
    }
}
