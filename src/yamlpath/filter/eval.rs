//! Filter evaluation.
//!
//! Comparisons lift both sides to lists of typed values: a literal is a
//! singleton, a path query contributes the typed value of every node it
//! matches. The comparison holds only when both lists are non-empty and
//! the concrete relation holds for every pair. Scalar nodes are typed by
//! their resolved tag; anything else compares by node identity only.

use crate::document::node::{Node, NodeKind};
use crate::yamlpath::evaluator;
use crate::yamlpath::filter::ast::{CompareOp, FilterExpr, Literal, QueryOrigin};

/// Evaluates a filter against the node under test and the query root.
pub(crate) fn matches(expr: &FilterExpr, node: &Node, root: &Node) -> bool {
    match expr {
        FilterExpr::And(left, right) => matches(left, node, root) && matches(right, node, root),
        FilterExpr::Or(left, right) => matches(left, node, root) || matches(right, node, root),
        FilterExpr::Not(operand) => !matches(operand, node, root),
        FilterExpr::Group(inner) => matches(inner, node, root),
        FilterExpr::PathQuery { origin, segments } => {
            !resolve(*origin, segments, node, root).is_empty()
        }
        // a bare literal selects nothing
        FilterExpr::Literal(_) => false,
        FilterExpr::Comparison { op: CompareOp::Matches, left, right } => {
            let FilterExpr::Literal(Literal::Regex(regex)) = right.as_ref() else {
                return false;
            };
            let lhs = operand_values(left, node, root);
            !lhs.is_empty()
                && lhs.iter().all(|value| match value {
                    Value::Str(s) => regex.is_match(s),
                    _ => false,
                })
        }
        FilterExpr::Comparison { op, left, right } => {
            let lhs = operand_values(left, node, root);
            let rhs = operand_values(right, node, root);
            !lhs.is_empty()
                && !rhs.is_empty()
                && lhs
                    .iter()
                    .all(|l| rhs.iter().all(|r| compare(l, *op, r)))
        }
    }
}

/// A typed value on one side of a comparison.
#[derive(Debug)]
enum Value<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Str(String),
    Node(&'a Node),
}

fn operand_values<'a>(expr: &FilterExpr, node: &'a Node, root: &'a Node) -> Vec<Value<'a>> {
    match expr {
        FilterExpr::Literal(literal) => match literal {
            Literal::Int(i) => vec![Value::Int(*i)],
            Literal::Float(f) => vec![Value::Float(*f)],
            Literal::Bool(b) => vec![Value::Bool(*b)],
            Literal::Null => vec![Value::Null],
            Literal::Str(s) => vec![Value::Str(s.clone())],
            Literal::Regex(_) => Vec::new(),
        },
        FilterExpr::PathQuery { origin, segments } => resolve(*origin, segments, node, root)
            .into_iter()
            .map(typed_value)
            .collect(),
        _ => Vec::new(),
    }
}

fn resolve<'a>(
    origin: QueryOrigin,
    segments: &[crate::yamlpath::segment::Segment],
    node: &'a Node,
    root: &'a Node,
) -> Vec<&'a Node> {
    let start = match origin {
        QueryOrigin::Context => node,
        QueryOrigin::Root => root,
    };
    evaluator::select(segments, start, root)
        .into_iter()
        .map(|(_, found)| found)
        .collect()
}

/// Types a matched node by its tag. Non-scalars carry their identity.
fn typed_value(node: &Node) -> Value<'_> {
    if node.kind() != NodeKind::Scalar {
        return Value::Node(node);
    }
    match node.tag() {
        "!!int" => node
            .value()
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(node.value().to_string())),
        "!!float" => node
            .value()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::Str(node.value().to_string())),
        "!!bool" => match node.value() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::Str(other.to_string()),
        },
        "!!null" => Value::Null,
        _ => Value::Str(node.value().to_string()),
    }
}

fn compare(left: &Value<'_>, op: CompareOp, right: &Value<'_>) -> bool {
    match op {
        CompareOp::Eq => equal(left, right),
        CompareOp::Ne => !equal(left, right),
        CompareOp::Lt => ordered(left, right).is_some_and(|ordering| ordering.is_lt()),
        CompareOp::Le => ordered(left, right).is_some_and(|ordering| ordering.is_le()),
        CompareOp::Gt => ordered(left, right).is_some_and(|ordering| ordering.is_gt()),
        CompareOp::Ge => ordered(left, right).is_some_and(|ordering| ordering.is_ge()),
        CompareOp::Matches => false,
    }
}

/// Equality: same-type comparison, int↔float coercion, identity for
/// nodes; everything else is unequal.
fn equal(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Node(a), Value::Node(b)) => std::ptr::eq(*a, *b),
        _ => false,
    }
}

/// Ordering is defined only between numeric values.
fn ordered(left: &Value<'_>, right: &Value<'_>) -> Option<std::cmp::Ordering> {
    let (a, b) = (as_f64(left)?, as_f64(right)?);
    a.partial_cmp(&b)
}

fn as_f64(value: &Value<'_>) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}
