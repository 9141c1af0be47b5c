//! Parsing of snapshot documents.
//!
//! Snapshots are stored as the raw body returned by the host, which for
//! Swagger/OpenAPI endpoints is JSON. Parsing goes through
//! `serde_json::Value` (built with `preserve_order`) and is then converted
//! into our [`Node`] tree so key order survives.
//!
//! # Examples
//!
//! ```
//! use swagger_watch::parser::parse_json;
//!
//! let node = parse_json(r#"{"swagger": "2.0", "paths": {}}"#).unwrap();
//! assert_eq!(node.type_name(), "object");
//! ```

use crate::error::ParseError;
use crate::tree::Node;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Reads and parses a stored snapshot file.
///
/// # Errors
///
/// - `ParseError::FileNotFound` if the path does not exist
/// - `ParseError::ReadError` if the file cannot be read
/// - `ParseError::JsonError` if the contents are not valid JSON
pub fn parse_snapshot(path: &Path) -> Result<Node, ParseError> {
    if !path.exists() {
        return Err(ParseError::file_not_found(
            path.to_string_lossy().to_string(),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ParseError::read_error(path.to_string_lossy().to_string(), e))?;

    parse_json(&content).map_err(|e| ParseError::json_error(path.to_string_lossy().to_string(), e))
}

/// Parses a JSON string into a Node.
pub fn parse_json(content: &str) -> Result<Node, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(json_to_node(value))
}

/// Converts a serde_json::Value to our Node representation.
pub fn json_to_node(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(b),
        // Every JSON number fits an f64 approximately; large integers lose precision.
        serde_json::Value::Number(n) => Node::Number(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(arr) => Node::Array(arr.into_iter().map(json_to_node).collect()),
        serde_json::Value::Object(obj) => {
            let map: IndexMap<String, Node> =
                obj.into_iter().map(|(k, v)| (k, json_to_node(v))).collect();
            Node::Object(map)
        }
    }
}
