//! Filter tree → constraint set compilation
//!
//! Classification per key:
//! - core column names compare directly against the entry attribute
//! - custom field names become existence tests over value rows
//! - relation fields with nested sub-filters become chain constraints
//! - the `or` group compiles recursively and conjoins as one unit
//!
//! Resolution is fail-open: unknown fields, unknown operators, and
//! malformed bound lists drop out of the constraint set. Dropped keys are
//! reported as diagnostics so stricter callers can surface them.

use crate::codec::CoreColumn;
use crate::schema::{CollectionId, FieldType, SchemaRegistry};

use super::ast::{FilterNode, FilterOp, FilterTree};
use super::constraint::{Constraint, ConstraintSet};
use super::operators::two_bounds;

/// Compilation output: the executable constraints plus the keys that were
/// dropped by fail-open resolution
#[derive(Debug, Clone, Default)]
pub struct CompiledFilter {
    pub constraints: ConstraintSet,
    /// Field names that did not resolve against the collection schema
    pub unknown_fields: Vec<String>,
}

/// Compiles a parsed filter tree against one collection's schema
pub fn compile(
    tree: &FilterTree,
    registry: &SchemaRegistry,
    collection: CollectionId,
) -> CompiledFilter {
    let mut out = CompiledFilter::default();
    out.constraints.constraints = compile_nodes(&tree.nodes, registry, collection, &mut out.unknown_fields);
    out
}

fn compile_nodes(
    nodes: &[FilterNode],
    registry: &SchemaRegistry,
    collection: CollectionId,
    unknown: &mut Vec<String>,
) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            FilterNode::Condition { field, op, operand } => {
                if let Some(c) = compile_condition(field, *op, operand, registry, collection, unknown)
                {
                    constraints.push(c);
                }
            }
            FilterNode::Chain { field, sub } => {
                if let Some(c) = compile_chain(field, sub, registry, collection, unknown) {
                    constraints.push(c);
                }
            }
            FilterNode::OrGroup(group) => {
                let children = compile_nodes(&group.nodes, registry, collection, unknown);
                if !children.is_empty() {
                    constraints.push(Constraint::Or(children));
                }
            }
        }
    }

    constraints
}

fn compile_condition(
    field: &str,
    op: FilterOp,
    operand: &serde_json::Value,
    registry: &SchemaRegistry,
    collection: CollectionId,
    unknown: &mut Vec<String>,
) -> Option<Constraint> {
    // Bound-pair operators require exactly two bounds; malformed input drops
    if matches!(op, FilterOp::Between | FilterOp::NotBetween) && two_bounds(operand).is_none() {
        return None;
    }

    if let Some(column) = CoreColumn::from_name(field) {
        return Some(Constraint::Core {
            column,
            op,
            operand: operand.clone(),
        });
    }

    let definition = match registry.field(collection, field) {
        Some(def) => def,
        None => {
            unknown.push(field.to_string());
            return None;
        }
    };

    // Group fields own no value rows of their own; not addressable here
    if definition.field_type.is_group() {
        unknown.push(field.to_string());
        return None;
    }

    match op {
        FilterOp::Not => Some(Constraint::ValueAbsent {
            field_id: definition.id,
            operand: operand.clone(),
        }),
        FilterOp::Null | FilterOp::NotNull => {
            let negated = op == FilterOp::NotNull;
            if definition.field_type.is_linking() {
                Some(Constraint::LinkNull {
                    field_id: definition.id,
                    field_type: definition.field_type,
                    negated,
                })
            } else {
                Some(Constraint::ValueNull {
                    field_id: definition.id,
                    negated,
                })
            }
        }
        _ => Some(Constraint::Value {
            field_id: definition.id,
            op,
            operand: operand.clone(),
        }),
    }
}

fn compile_chain(
    field: &str,
    sub: &FilterTree,
    registry: &SchemaRegistry,
    collection: CollectionId,
    unknown: &mut Vec<String>,
) -> Option<Constraint> {
    let definition = match registry.field(collection, field) {
        Some(def) => def,
        None => {
            unknown.push(field.to_string());
            return None;
        }
    };

    // Chains traverse relation fields only
    let target = match (definition.field_type, definition.options.relation_collection) {
        (FieldType::Relation, Some(target)) => target,
        _ => {
            unknown.push(field.to_string());
            return None;
        }
    };

    let compiled = compile(sub, registry, target);
    unknown.extend(compiled.unknown_fields);
    if compiled.constraints.is_empty() {
        return None;
    }

    Some(Constraint::Chain {
        field_id: definition.id,
        target,
        sub: compiled.constraints,
    })
}
