//! Raw input → typed value encoding
//!
//! One exhaustive dispatch over the declared type. Malformed scalar input
//! degrades to `WriteDecision::Skip` (validation is an external layer);
//! only password hashing can fail hard.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::schema::{DateMode, FieldDefinition, FieldType};

use super::errors::{CodecError, CodecResult};
use super::resolve::IdResolver;
use super::value::{Value, WriteDecision};

/// Literal delimiter between the bounds of a range input
pub const RANGE_DELIMITER: &str = " - ";

/// Encodes one raw input for a field into a write decision.
///
/// Null and empty-string input is skipped for every type. Group fields are
/// always skipped here; the group manager writes their children instead.
pub fn encode(
    field: &FieldDefinition,
    raw: &serde_json::Value,
    resolver: &IdResolver<'_>,
) -> CodecResult<WriteDecision> {
    if is_empty_input(raw) {
        return Ok(WriteDecision::Skip);
    }

    let value = match field.field_type {
        FieldType::Number => match parse_number(raw) {
            Some(n) => Value::Number(n),
            None => return Ok(WriteDecision::Skip),
        },
        FieldType::Boolean => Value::Bool(truthy(raw)),
        FieldType::Date => match encode_date(field, raw) {
            Some(v) => v,
            None => return Ok(WriteDecision::Skip),
        },
        FieldType::Enumeration => Value::Json(normalize_enumeration(raw)),
        FieldType::Json => match normalize_json(raw) {
            Some(v) => Value::Json(v),
            None => return Ok(WriteDecision::Skip),
        },
        FieldType::Media | FieldType::Relation => Value::IdList(resolver.resolve(
            field.field_type,
            field.options.relation_collection,
            raw,
        )),
        FieldType::Password => match raw.as_str() {
            Some(plain) if !plain.is_empty() => Value::Text(hash_password(plain)?),
            // Empty secrets are a no-op so updates can omit unchanged ones
            _ => return Ok(WriteDecision::Skip),
        },
        FieldType::Richtext => match encode_richtext(raw) {
            Some(v) => v,
            None => return Ok(WriteDecision::Skip),
        },
        FieldType::Text
        | FieldType::Longtext
        | FieldType::Slug
        | FieldType::Email
        | FieldType::Color
        | FieldType::Time => match stringify_scalar(raw) {
            Some(s) => Value::Text(s),
            None => return Ok(WriteDecision::Skip),
        },
        FieldType::Group => return Ok(WriteDecision::Skip),
    };

    Ok(WriteDecision::Write(value))
}

/// Null and empty strings carry no value. Empty arrays still encode for
/// linking fields (an explicit clear), so they are not empty input.
fn is_empty_input(raw: &serde_json::Value) -> bool {
    match raw {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Truthiness coercion for boolean fields
pub fn truthy(raw: &serde_json::Value) -> bool {
    match raw {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        serde_json::Value::String(s) => !(s.is_empty() || s == "0" || s == "false"),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(_) => true,
    }
}

/// Numbers stored as-is; numeric strings parsed
pub fn parse_number(raw: &serde_json::Value) -> Option<f64> {
    match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn encode_date(field: &FieldDefinition, raw: &serde_json::Value) -> Option<Value> {
    let input = raw.as_str()?;

    let (start_str, end_str) = if field.options.date_mode == DateMode::Range {
        match input.split_once(RANGE_DELIMITER) {
            Some((s, e)) => (s, Some(e)),
            // Missing delimiter: single unbounded value, not an error
            None => (input, None),
        }
    } else {
        (input, None)
    };

    if field.options.include_time {
        let start = parse_datetime(start_str)?;
        let end = end_str.and_then(parse_datetime);
        Some(Value::DateTime { start, end })
    } else {
        let start = parse_naive_date(start_str)?;
        let end = end_str.and_then(parse_naive_date);
        Some(Value::Date { start, end })
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form
pub fn parse_naive_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Parses an RFC 3339 timestamp, falling back to common unzoned forms
/// interpreted as UTC
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Normalizes enumeration input to an array of scalars. Array elements that
/// are objects carrying a `value` key unwrap to that scalar.
fn normalize_enumeration(raw: &serde_json::Value) -> serde_json::Value {
    let items: Vec<&serde_json::Value> = match raw {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let normalized = items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(map) => map.get("value").cloned().unwrap_or(item.clone()),
            other => other.clone(),
        })
        .collect();

    serde_json::Value::Array(normalized)
}

/// JSON fields store arrays as-is; strings are stored decoded when they
/// parse as JSON and wrapped otherwise; any other input is already JSON.
fn normalize_json(raw: &serde_json::Value) -> Option<serde_json::Value> {
    match raw {
        serde_json::Value::Array(_) => Some(raw.clone()),
        serde_json::Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(decoded) => Some(decoded),
            Err(_) => Some(serde_json::Value::Array(vec![raw.clone()])),
        },
        other => Some(other.clone()),
    }
}

/// String input is legacy HTML; structured input fills the json column; an
/// object with an `html` string member alongside other content fills both.
fn encode_richtext(raw: &serde_json::Value) -> Option<Value> {
    match raw {
        serde_json::Value::String(s) => Some(Value::RichText {
            html: Some(s.clone()),
            structured: None,
        }),
        serde_json::Value::Object(map) => {
            let html = map.get("html").and_then(|v| v.as_str()).map(String::from);
            Some(Value::RichText {
                html,
                structured: Some(raw.clone()),
            })
        }
        serde_json::Value::Array(_) => Some(Value::RichText {
            html: None,
            structured: Some(raw.clone()),
        }),
        _ => None,
    }
}

/// Text-family fields accept scalars, coerced to their string form
fn stringify_scalar(raw: &serde_json::Value) -> Option<String> {
    match raw {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Hashes a password into an Argon2id PHC string
fn hash_password(plain: &str) -> CodecResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CodecError::HashFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::resolve::{AssetLookup, EntryLookup};
    use crate::schema::{CollectionId, FieldOptions};
    use serde_json::json;
    use uuid::Uuid;

    struct NoCatalog;

    impl AssetLookup for NoCatalog {
        fn asset_id_by_uuid(&self, _uuid: &Uuid) -> Option<i64> {
            None
        }
    }

    impl EntryLookup for NoCatalog {
        fn entry_id_by_uuid(&self, _c: Option<CollectionId>, _uuid: &Uuid) -> Option<i64> {
            None
        }
    }

    fn encode_plain(field: &FieldDefinition, raw: serde_json::Value) -> WriteDecision {
        let cat = NoCatalog;
        let resolver = IdResolver::new(&cat, &cat);
        encode(field, &raw, &resolver).unwrap()
    }

    fn field(field_type: FieldType) -> FieldDefinition {
        FieldDefinition::new(1, "f", field_type)
    }

    #[test]
    fn test_empty_input_skipped() {
        assert!(encode_plain(&field(FieldType::Text), json!(null)).is_skip());
        assert!(encode_plain(&field(FieldType::Text), json!("")).is_skip());
        assert!(encode_plain(&field(FieldType::Number), json!("")).is_skip());
    }

    #[test]
    fn test_number_encoding() {
        assert_eq!(
            encode_plain(&field(FieldType::Number), json!(42)).written(),
            Some(Value::Number(42.0))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Number), json!("3.5")).written(),
            Some(Value::Number(3.5))
        );
        assert!(encode_plain(&field(FieldType::Number), json!("abc")).is_skip());
    }

    #[test]
    fn test_boolean_truthiness() {
        assert_eq!(
            encode_plain(&field(FieldType::Boolean), json!("false")).written(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Boolean), json!("0")).written(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Boolean), json!(1)).written(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Boolean), json!("yes")).written(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_date_single() {
        let decision = encode_plain(&field(FieldType::Date), json!("2024-03-01"));
        assert_eq!(
            decision.written(),
            Some(Value::Date {
                start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end: None,
            })
        );
    }

    #[test]
    fn test_date_range_split_on_delimiter() {
        let f = field(FieldType::Date).with_options(FieldOptions {
            date_mode: DateMode::Range,
            ..FieldOptions::default()
        });
        let decision = encode_plain(&f, json!("2024-03-01 - 2024-03-31"));
        assert_eq!(
            decision.written(),
            Some(Value::Date {
                start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end: Some(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
            })
        );
    }

    #[test]
    fn test_date_range_without_delimiter_is_open_ended() {
        let f = field(FieldType::Date).with_options(FieldOptions {
            date_mode: DateMode::Range,
            ..FieldOptions::default()
        });
        let decision = encode_plain(&f, json!("2024-03-01"));
        assert_eq!(
            decision.written(),
            Some(Value::Date {
                start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end: None,
            })
        );
    }

    #[test]
    fn test_datetime_when_include_time() {
        let f = field(FieldType::Date).with_options(FieldOptions {
            include_time: true,
            ..FieldOptions::default()
        });
        let decision = encode_plain(&f, json!("2024-03-01T10:30:00Z"));
        match decision.written() {
            Some(Value::DateTime { start, end }) => {
                assert_eq!(start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), "2024-03-01T10:30:00Z");
                assert!(end.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_enumeration_normalization() {
        assert_eq!(
            encode_plain(&field(FieldType::Enumeration), json!(["a", "b"])).written(),
            Some(Value::Json(json!(["a", "b"])))
        );
        // Object elements with a value key unwrap to that scalar
        assert_eq!(
            encode_plain(
                &field(FieldType::Enumeration),
                json!([{"value": "a", "label": "A"}, "b"])
            )
            .written(),
            Some(Value::Json(json!(["a", "b"])))
        );
        // Scalar input wraps into a one-element array
        assert_eq!(
            encode_plain(&field(FieldType::Enumeration), json!("solo")).written(),
            Some(Value::Json(json!(["solo"])))
        );
    }

    #[test]
    fn test_json_field_string_decoding() {
        assert_eq!(
            encode_plain(&field(FieldType::Json), json!("{\"a\":1}")).written(),
            Some(Value::Json(json!({"a": 1})))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Json), json!("not json")).written(),
            Some(Value::Json(json!(["not json"])))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Json), json!([1, 2])).written(),
            Some(Value::Json(json!([1, 2])))
        );
    }

    #[test]
    fn test_password_hashing_and_skip() {
        assert!(encode_plain(&field(FieldType::Password), json!("")).is_skip());

        match encode_plain(&field(FieldType::Password), json!("s3cret")).written() {
            Some(Value::Text(hash)) => {
                assert!(hash.starts_with("$argon2"));
                assert_ne!(hash, "s3cret");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_richtext_variants() {
        assert_eq!(
            encode_plain(&field(FieldType::Richtext), json!("<p>hi</p>")).written(),
            Some(Value::RichText {
                html: Some("<p>hi</p>".into()),
                structured: None,
            })
        );

        let structured = json!({"html": "<p>hi</p>", "blocks": [1]});
        assert_eq!(
            encode_plain(&field(FieldType::Richtext), structured.clone()).written(),
            Some(Value::RichText {
                html: Some("<p>hi</p>".into()),
                structured: Some(structured),
            })
        );
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(
            encode_plain(&field(FieldType::Slug), json!("hello-world")).written(),
            Some(Value::Text("hello-world".into()))
        );
        assert_eq!(
            encode_plain(&field(FieldType::Text), json!(7)).written(),
            Some(Value::Text("7".into()))
        );
        assert!(encode_plain(&field(FieldType::Text), json!({"a": 1})).is_skip());
    }

    #[test]
    fn test_group_never_encodes() {
        assert!(encode_plain(&field(FieldType::Group), json!({"city": "x"})).is_skip());
    }
}
