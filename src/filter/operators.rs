//! Operand coercion and scalar comparison helpers
//!
//! Filter operands arrive as query-parameter strings or JSON scalars; these
//! helpers coerce them against each column type. Comparison never errors:
//! an operand that cannot be coerced simply fails to match.

use serde_json::Value;

use crate::codec::parse_number;

use super::ast::FilterOp;

/// Generic ordering comparison for the five comparator operators.
/// Other operators never reach this helper.
pub fn cmp_ord<T: PartialOrd>(actual: &T, operand: &T, op: FilterOp) -> bool {
    match op {
        FilterOp::Eq => actual == operand,
        FilterOp::Lt => actual < operand,
        FilterOp::Lte => actual <= operand,
        FilterOp::Gt => actual > operand,
        FilterOp::Gte => actual >= operand,
        _ => false,
    }
}

/// Scalar operand to comparable string; arrays and objects do not coerce
pub fn operand_string(operand: &Value) -> Option<String> {
    match operand {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric-looking operands: numbers and parseable strings
pub fn numeric_operand(operand: &Value) -> Option<f64> {
    parse_number(operand)
}

/// Boolean-coercible operands: booleans and the literal strings
/// "true"/"false"/"1"/"0"
pub fn boolean_operand(operand: &Value) -> Option<bool> {
    match operand {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// List operand for `in`/`not_in`: an array, or a comma-separated string
pub fn operand_list(operand: &Value) -> Vec<Value> {
    match operand {
        Value::Array(items) => items.clone(),
        Value::String(s) => s
            .split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
        other => vec![other.clone()],
    }
}

/// Bound pair for `between`/`not_between`; anything but exactly two bounds
/// yields None
pub fn two_bounds(operand: &Value) -> Option<(Value, Value)> {
    let items = operand_list(operand);
    match items.as_slice() {
        [lo, hi] => Some((lo.clone(), hi.clone())),
        _ => None,
    }
}

/// SQL-style LIKE matching: `%` matches any sequence, `_` a single character
pub fn like_match(value: &str, pattern: &str) -> bool {
    fn inner(value: &[char], pattern: &[char]) -> bool {
        match (pattern.first(), value.first()) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some('%'), _) => {
                if pattern.len() == 1 {
                    return true;
                }
                let mut rest = value;
                loop {
                    if inner(rest, &pattern[1..]) {
                        return true;
                    }
                    if rest.is_empty() {
                        return false;
                    }
                    rest = &rest[1..];
                }
            }
            (Some('_'), Some(_)) => inner(&value[1..], &pattern[1..]),
            (Some(p), Some(v)) if p == v => inner(&value[1..], &pattern[1..]),
            _ => false,
        }
    }

    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    inner(&value, &pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cmp_ord() {
        assert!(cmp_ord(&5, &5, FilterOp::Eq));
        assert!(cmp_ord(&4, &5, FilterOp::Lt));
        assert!(cmp_ord(&5, &5, FilterOp::Lte));
        assert!(cmp_ord(&6, &5, FilterOp::Gt));
        assert!(!cmp_ord(&4, &5, FilterOp::Gte));
        assert!(!cmp_ord(&4, &5, FilterOp::Like));
    }

    #[test]
    fn test_boolean_operand_is_strict() {
        assert_eq!(boolean_operand(&json!("true")), Some(true));
        assert_eq!(boolean_operand(&json!("0")), Some(false));
        assert_eq!(boolean_operand(&json!(1)), Some(true));
        assert_eq!(boolean_operand(&json!("yes")), None);
        assert_eq!(boolean_operand(&json!(2)), None);
    }

    #[test]
    fn test_operand_list_comma_split() {
        let list = operand_list(&json!("a, b,c"));
        assert_eq!(list, vec![json!("a"), json!("b"), json!("c")]);

        let list = operand_list(&json!([1, 2]));
        assert_eq!(list, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_two_bounds_requires_exactly_two() {
        assert!(two_bounds(&json!([1, 10])).is_some());
        assert!(two_bounds(&json!("5,15")).is_some());
        assert!(two_bounds(&json!([1])).is_none());
        assert!(two_bounds(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("Johnson", "%son"));
        assert!(like_match("Wilson", "%son"));
        assert!(!like_match("Smith", "%son"));
        assert!(like_match("cat", "c_t"));
        assert!(like_match("anything", "%"));
        assert!(!like_match("cat", "c_"));
        assert!(like_match("hello world", "hello%"));
    }
}
