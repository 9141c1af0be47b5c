//! Structural diff of two document trees.
//!
//! The comparison walks both trees in lock step. Objects are compared key by
//! key, arrays index by index, and scalars by plain equality. There is no
//! schema awareness and no attempt to match reordered array elements: an
//! array whose length changed is reported with a single marker and not
//! descended into.
//!
//! Each [`Difference`] carries two pieces of location:
//!
//! - `parents`: the segments from the document root to the node whose
//!   comparison detected the divergence (object keys, or `"[i]"` for array
//!   positions)
//! - `path`: the key relative to that node, for additions and deletions.
//!   Scalar modifications and length markers have an empty `path`.
//!
//! # Examples
//!
//! ```
//! use swagger_watch::diff::{compare, DifferenceKind};
//! use swagger_watch::parser::parse_json;
//!
//! let old = parse_json(r#"{"a": 1, "b": 2}"#).unwrap();
//! let new = parse_json(r#"{"a": 1, "b": 3, "c": 4}"#).unwrap();
//!
//! let comparison = compare(&old, &new);
//! assert!(!comparison.is_equal());
//! assert_eq!(comparison.differences.len(), 2);
//! assert_eq!(comparison.differences[0].kind, Some(DifferenceKind::Modification));
//! assert_eq!(comparison.differences[1].kind, Some(DifferenceKind::Addition));
//! ```

use crate::tree::Node;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// The kind of a detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DifferenceKind {
    /// Key exists in the new document but not the old one
    Addition,
    /// Key exists in the old document but not the new one
    Deletion,
    /// Scalar value changed
    Modification,
}

impl DifferenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            DifferenceKind::Addition => "Addition",
            DifferenceKind::Deletion => "Deletion",
            DifferenceKind::Modification => "Modification",
        }
    }
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single divergence between two documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Key relative to the node that detected the divergence
    pub path: String,
    /// Removed value for deletions, added value for additions, old value for
    /// modifications; `None` for array length markers
    pub value: Option<Node>,
    /// Segments from the root down to the comparing node
    pub parents: Vec<String>,
    /// `None` marks an array whose length changed
    pub kind: Option<DifferenceKind>,
}

impl Difference {
    pub fn addition(key: &str, value: Node, parents: &[String]) -> Self {
        Self {
            path: key.to_string(),
            value: Some(value),
            parents: parents.to_vec(),
            kind: Some(DifferenceKind::Addition),
        }
    }

    pub fn deletion(key: &str, value: Node, parents: &[String]) -> Self {
        Self {
            path: key.to_string(),
            value: Some(value),
            parents: parents.to_vec(),
            kind: Some(DifferenceKind::Deletion),
        }
    }

    pub fn modification(old_value: Node, parents: &[String]) -> Self {
        Self {
            path: String::new(),
            value: Some(old_value),
            parents: parents.to_vec(),
            kind: Some(DifferenceKind::Modification),
        }
    }

    pub fn length_mismatch(parents: &[String]) -> Self {
        Self {
            path: String::new(),
            value: None,
            parents: parents.to_vec(),
            kind: None,
        }
    }

    pub fn is_length_mismatch(&self) -> bool {
        self.kind.is_none()
    }

    /// Absolute location of the difference: `parents` followed by `path`
    /// when it is non-empty.
    pub fn location(&self) -> Vec<String> {
        let mut location = self.parents.clone();
        let path = self.path.trim_start_matches('.');
        if !path.is_empty() {
            location.push(path.to_string());
        }
        location
    }
}

/// Counts per difference kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub length_mismatches: usize,
    /// Nodes whose kinds differ; these are not itemized as differences
    pub kind_mismatches: usize,
}

impl DiffStats {
    pub fn total(&self) -> usize {
        self.additions
            + self.deletions
            + self.modifications
            + self.length_mismatches
            + self.kind_mismatches
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The result of comparing two documents.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub differences: Vec<Difference>,
    /// Number of nodes whose kinds differ. Such nodes contribute no
    /// difference, so below the root they leave their parent equal.
    pub kind_mismatches: usize,
    /// The two roots themselves have different kinds
    pub root_kind_mismatch: bool,
}

impl Comparison {
    /// Equal iff no differences were produced and the roots share a kind.
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty() && !self.root_kind_mismatch
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            kind_mismatches: self.kind_mismatches,
            ..DiffStats::default()
        };
        for difference in &self.differences {
            match difference.kind {
                Some(DifferenceKind::Addition) => stats.additions += 1,
                Some(DifferenceKind::Deletion) => stats.deletions += 1,
                Some(DifferenceKind::Modification) => stats.modifications += 1,
                None => stats.length_mismatches += 1,
            }
        }
        stats
    }
}

/// Compares two documents from the root.
pub fn compare(old: &Node, new: &Node) -> Comparison {
    compare_at(old, new, &[])
}

/// Compares two documents that sit below `parents`.
pub fn compare_at(old: &Node, new: &Node, parents: &[String]) -> Comparison {
    let mut comparison = Comparison {
        root_kind_mismatch: old.kind() != new.kind(),
        ..Comparison::default()
    };
    diff_nodes(old, new, parents, &mut comparison);
    comparison
}

/// Appends the differences between `old` and `new` to `out`.
fn diff_nodes(old: &Node, new: &Node, parents: &[String], out: &mut Comparison) {
    if old.kind() != new.kind() {
        trace!(
            parents = ?parents,
            old = old.type_name(),
            new = new.type_name(),
            "node kinds differ"
        );
        out.kind_mismatches += 1;
        return;
    }

    match (old, new) {
        (Node::Object(old_map), Node::Object(new_map)) => {
            diff_objects(old_map, new_map, parents, out)
        }
        (Node::Array(old_items), Node::Array(new_items)) => {
            diff_arrays(old_items, new_items, parents, out)
        }
        _ => {
            if old != new {
                out.differences
                    .push(Difference::modification(old.clone(), parents));
            }
        }
    }
}

fn diff_objects(
    old_map: &IndexMap<String, Node>,
    new_map: &IndexMap<String, Node>,
    parents: &[String],
    out: &mut Comparison,
) {
    for (key, old_value) in old_map {
        match new_map.get(key) {
            None => out
                .differences
                .push(Difference::deletion(key, old_value.clone(), parents)),
            Some(new_value) => {
                let child = child_parents(parents, key.clone());
                diff_nodes(old_value, new_value, &child, out);
            }
        }
    }

    for (key, new_value) in new_map {
        if !old_map.contains_key(key) {
            out.differences
                .push(Difference::addition(key, new_value.clone(), parents));
        }
    }
}

fn diff_arrays(old_items: &[Node], new_items: &[Node], parents: &[String], out: &mut Comparison) {
    if old_items.len() != new_items.len() {
        out.differences.push(Difference::length_mismatch(parents));
        return;
    }

    for (i, (old_item, new_item)) in old_items.iter().zip(new_items).enumerate() {
        let child = child_parents(parents, format!("[{}]", i));
        diff_nodes(old_item, new_item, &child, out);
    }
}

fn child_parents(parents: &[String], segment: String) -> Vec<String> {
    let mut child = Vec::with_capacity(parents.len() + 1);
    child.extend_from_slice(parents);
    child.push(segment);
    child
}
