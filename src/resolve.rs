//! Endpoint resolution.
//!
//! Given a document and a value, [`find_occurrences`] walks every leaf whose
//! rendered value equals the target and turns the leaf's location into an
//! endpoint reference. The location is accumulated as a dotted string
//! (`.paths./pet.get.parameters[0].name`) and handed to an
//! [`EndpointCanonicalizer`], which decides what part of it identifies the
//! endpoint.

use crate::tree::Node;
use tracing::trace;

/// Turns an accumulated document location into an endpoint reference.
pub trait EndpointCanonicalizer {
    fn canonicalize(&self, location: &str) -> String;
}

/// Canonicalizer for Swagger 2 / OpenAPI 3 documents.
///
/// Endpoint identity lives in the first three location segments, e.g.
/// `paths./pet.get` for the `GET /pet` operation. See [`extract_path`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiPaths;

impl EndpointCanonicalizer for OpenApiPaths {
    fn canonicalize(&self, location: &str) -> String {
        extract_path(location)
    }
}

impl<F> EndpointCanonicalizer for F
where
    F: Fn(&str) -> String,
{
    fn canonicalize(&self, location: &str) -> String {
        self(location)
    }
}

/// Number of leading location segments that identify an endpoint.
pub const ENDPOINT_SEGMENTS: usize = 3;

/// Top-level sections whose name is dropped from endpoint references.
const ROOT_SECTIONS: [&str; 2] = ["fileUrls", "paths"];

/// Derives an endpoint reference from a dotted document location.
///
/// Keeps the first [`ENDPOINT_SEGMENTS`] segments, drops a leading `paths`
/// or `fileUrls` section, joins the rest with `/` and prefixes `#` (or `#/`
/// when the result does not already start with a slash).
///
/// # Examples
///
/// ```
/// use swagger_watch::resolve::extract_path;
///
/// assert_eq!(extract_path("paths.pet.get.200.description"), "#/pet/get");
/// assert_eq!(extract_path(".paths./pet.post.parameters[0].schema.$ref"), "#/pet/post");
/// assert_eq!(extract_path(".definitions.Pet.properties.name"), "#/definitions/Pet/properties");
/// ```
pub fn extract_path(location: &str) -> String {
    let location = location.strip_prefix('.').unwrap_or(location);
    let mut segments: Vec<&str> = location.split('.').take(ENDPOINT_SEGMENTS).collect();

    if segments
        .first()
        .is_some_and(|first| ROOT_SECTIONS.contains(first))
    {
        segments.remove(0);
    }

    let joined = segments.join("/");
    if joined.starts_with('/') {
        format!("#{}", joined)
    } else {
        format!("#/{}", joined)
    }
}

/// Finds every leaf in `doc` whose rendered value equals `target` and
/// returns the endpoint reference for each, in document order.
///
/// `current_path` is the location of `doc` itself; pass `""` for a root.
/// The result may contain duplicates when several leaves map to the same
/// endpoint.
pub fn find_occurrences(doc: &Node, target: &str, current_path: &str) -> Vec<String> {
    find_occurrences_with(doc, target, current_path, &OpenApiPaths)
}

/// Like [`find_occurrences`] with an explicit canonicalizer.
pub fn find_occurrences_with(
    doc: &Node,
    target: &str,
    current_path: &str,
    canonicalizer: &dyn EndpointCanonicalizer,
) -> Vec<String> {
    let mut found = Vec::new();
    walk(doc, target, current_path.to_string(), canonicalizer, &mut found);
    found
}

fn walk(
    node: &Node,
    target: &str,
    location: String,
    canonicalizer: &dyn EndpointCanonicalizer,
    found: &mut Vec<String>,
) {
    match node {
        Node::Object(map) => {
            for (key, value) in map {
                walk(value, target, format!("{}.{}", location, key), canonicalizer, found);
            }
        }
        Node::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, target, format!("{}[{}]", location, i), canonicalizer, found);
            }
        }
        leaf => {
            if leaf.render() == target {
                let endpoint = canonicalizer.canonicalize(&location);
                trace!(%location, %endpoint, "value occurrence");
                found.push(endpoint);
            }
        }
    }
}
