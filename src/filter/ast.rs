//! Filter expression AST
//!
//! The caller-facing filter is a nested JSON object mirroring the
//! query-parameter DSL:
//!
//! ```text
//! where[fieldName][operator] = value
//! where[fieldName] = scalar                              // implicit eq
//! where[or][fieldName][operator] = value                 // disjunctive group
//! where[0][relationField][subField][operator] = value    // relation chain
//! ```

use serde_json::Value;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Negated equality, compiled as "no matching row" for custom fields
    Not,
    /// Pattern match, `%` any sequence and `_` single character
    Like,
    In,
    NotIn,
    Null,
    NotNull,
    Between,
    NotBetween,
}

impl FilterOp {
    /// Parses an operator name; unknown names yield None
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(FilterOp::Eq),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "not" => Some(FilterOp::Not),
            "like" => Some(FilterOp::Like),
            "in" => Some(FilterOp::In),
            "not_in" => Some(FilterOp::NotIn),
            "null" => Some(FilterOp::Null),
            "not_null" => Some(FilterOp::NotNull),
            "between" => Some(FilterOp::Between),
            "not_between" => Some(FilterOp::NotBetween),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Not => "not",
            FilterOp::Like => "like",
            FilterOp::In => "in",
            FilterOp::NotIn => "not_in",
            FilterOp::Null => "null",
            FilterOp::NotNull => "not_null",
            FilterOp::Between => "between",
            FilterOp::NotBetween => "not_between",
        }
    }

    /// Operators taking no operand
    pub fn is_nullary(&self) -> bool {
        matches!(self, FilterOp::Null | FilterOp::NotNull)
    }
}

/// One parsed filter node
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// field <op> operand
    Condition {
        field: String,
        op: FilterOp,
        operand: Value,
    },
    /// Sub-filter applied to the targets of a relation field
    Chain { field: String, sub: FilterTree },
    /// Entries combined disjunctively, conjoined with siblings as one unit
    OrGroup(FilterTree),
}

/// A parsed filter tree; sibling nodes combine with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterTree {
    pub nodes: Vec<FilterNode>,
}

impl FilterTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Reserved key introducing a disjunctive group
const OR_KEY: &str = "or";

/// Parses the caller-facing filter object into a tree.
///
/// Non-object input parses to an empty tree; the shape itself is never an
/// error (fail-open).
pub fn parse_filter(input: &Value) -> FilterTree {
    let mut tree = FilterTree::default();
    let map = match input.as_object() {
        Some(map) => map,
        None => return tree,
    };

    for (key, value) in map {
        if key == OR_KEY {
            let group = parse_filter(value);
            if !group.is_empty() {
                tree.nodes.push(FilterNode::OrGroup(group));
            }
            continue;
        }

        // Integer keys mark relation-chain blocks: each member names a
        // relation field filtered by its own sub-tree
        if key.parse::<u32>().is_ok() {
            if let Some(block) = value.as_object() {
                for (rel_field, sub_value) in block {
                    tree.nodes.extend(parse_field(rel_field, sub_value));
                }
            }
            continue;
        }

        tree.nodes.extend(parse_field(key, value));
    }

    tree
}

/// Parses one field entry: scalar (implicit eq), operator map, or nested
/// relation-chain mapping
fn parse_field(field: &str, value: &Value) -> Vec<FilterNode> {
    let map = match value.as_object() {
        Some(map) => map,
        // Scalars and arrays are implicit equality
        None => {
            return vec![FilterNode::Condition {
                field: field.to_string(),
                op: FilterOp::Eq,
                operand: value.clone(),
            }]
        }
    };

    let all_operators = !map.is_empty() && map.keys().all(|k| FilterOp::parse(k).is_some());
    if all_operators {
        return map
            .iter()
            .filter_map(|(op_name, operand)| {
                FilterOp::parse(op_name).map(|op| FilterNode::Condition {
                    field: field.to_string(),
                    op,
                    operand: operand.clone(),
                })
            })
            .collect();
    }

    // Nested mapping with non-operator keys: relation-chain sub-filter
    let sub = parse_filter(value);
    if sub.is_empty() {
        return Vec::new();
    }
    vec![FilterNode::Chain {
        field: field.to_string(),
        sub,
    }]
}
