//! Document tree for fetched Swagger/OpenAPI documents.

use indexmap::IndexMap;
use std::fmt;

/// A node in a parsed JSON document.
///
/// Objects keep their keys in document order so that differences and
/// endpoint lookups come out in the order the author wrote them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(IndexMap<String, Node>),
    Array(Vec<Node>),
}

/// The dynamic kind of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
        }
    }

    /// Renders the node the way it is matched and reported.
    ///
    /// Strings are rendered bare (no quotes), integral numbers without a
    /// fractional part, and containers as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Number(n) => format_number(*n),
            Node::String(s) => s.clone(),
            Node::Object(_) | Node::Array(_) => self.to_json_value().to_string(),
        }
    }

    /// Converts the node back into a `serde_json::Value`.
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => {
                if is_integral(*n) {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
            Node::String(s) => Value::String(s.clone()),
            Node::Array(items) => Value::Array(items.iter().map(Node::to_json_value).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
