//! YAML parsing into the query tree.
//!
//! Parses YAML text with `serde_yaml` and converts the resulting value
//! into a [`Node`] tree, resolving implicit scalar tags (`!!int`,
//! `!!float`, `!!bool`, `!!null`, `!!str`) from the parsed types so that
//! filter comparisons see properly typed values. Explicitly tagged values
//! keep their application tag.
//!
//! The top-level result is always a Document node wrapping the root
//! value, matching what path evaluation expects a `$` step to unwrap.

use crate::document::node::{Node, NodeKind};
use anyhow::{bail, Context, Result};
use serde_yaml::Value;

/// Parses a YAML string into a Document node.
///
/// # Example
///
/// ```
/// use yamlscout::document::parser::from_str;
/// use yamlscout::document::node::NodeKind;
///
/// let doc = from_str("name: Alice\nage: 30").unwrap();
/// assert_eq!(doc.kind(), NodeKind::Document);
/// assert_eq!(doc.content()[0].kind(), NodeKind::Mapping);
/// ```
pub fn from_str(text: &str) -> Result<Node> {
    let value: Value = serde_yaml::from_str(text).context("failed to parse YAML")?;
    Ok(Node::document(convert_value(value)?))
}

/// Converts a `serde_yaml::Value` into a [`Node`], resolving tags.
fn convert_value(value: Value) -> Result<Node> {
    let node = match value {
        Value::Null => Node::null(),
        Value::Bool(b) => Node::bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::int(i)
            } else if let Some(u) = n.as_u64() {
                // beyond i64 range; keep the exact spelling
                Node::scalar(u.to_string(), "!!int")
            } else {
                Node::float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Node::string(s),
        Value::Sequence(seq) => {
            let elements: Result<Vec<Node>> = seq.into_iter().map(convert_value).collect();
            Node::sequence(elements?)
        }
        Value::Mapping(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (k, v) in map {
                pairs.push((convert_key(k)?, convert_value(v)?));
            }
            Node::mapping(pairs)
        }
        Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let mut node = convert_value(tagged.value)?;
            node.tag = tag;
            node
        }
    };
    Ok(node)
}

/// Converts a mapping key into a key node, preserving its spelling.
fn convert_key(key: Value) -> Result<Node> {
    let node = match key {
        Value::String(s) => Node::string(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::int(i)
            } else if let Some(u) = n.as_u64() {
                Node::scalar(u.to_string(), "!!int")
            } else {
                Node::float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Bool(b) => Node::bool(b),
        Value::Null => Node::null(),
        other => bail!("unsupported mapping key: {:?}", other),
    };
    Ok(node)
}

/// Converts a [`Node`] back into a `serde_yaml::Value` for output.
///
/// Document nodes unwrap to their root value; alias leaves render as
/// their anchor name.
pub fn to_value(node: &Node) -> Value {
    match node.kind() {
        NodeKind::Document => node
            .content()
            .first()
            .map(to_value)
            .unwrap_or(Value::Null),
        NodeKind::Mapping => {
            let mut map = serde_yaml::Mapping::new();
            for (key, value) in node.entries() {
                map.insert(scalar_value(key), to_value(value));
            }
            Value::Mapping(map)
        }
        NodeKind::Sequence => Value::Sequence(node.content().iter().map(to_value).collect()),
        NodeKind::Scalar => scalar_value(node),
        NodeKind::Alias => Value::String(node.value().to_string()),
    }
}

fn scalar_value(node: &Node) -> Value {
    match node.tag() {
        "!!int" => node
            .value()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(node.value().to_string())),
        "!!float" => node
            .value()
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(node.value().to_string())),
        "!!bool" => match node.value() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        },
        "!!null" => Value::Null,
        _ => Value::String(node.value().to_string()),
    }
}
