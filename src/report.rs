//! Change reports.
//!
//! A report turns a [`Comparison`] into one descriptive line per difference,
//! each followed by the endpoints of the new document that the change
//! affects. Endpoints are found by a fixed-point search: a seed reference
//! derived from the difference's parents is looked up in the new document,
//! every reference found is looked up in turn, and references that lead
//! nowhere new are the result.
//!
//! # Examples
//!
//! ```
//! use swagger_watch::diff::compare;
//! use swagger_watch::parser::parse_json;
//! use swagger_watch::report::build_report;
//!
//! let old = parse_json(r#"{"a": 1, "b": 2}"#).unwrap();
//! let new = parse_json(r#"{"a": 1, "b": 3, "c": 4}"#).unwrap();
//!
//! let report = build_report(&compare(&old, &new), &new, "api.example.com");
//! assert!(!report.is_equal());
//! assert_eq!(report.entries.len(), 2);
//! ```

use crate::diff::{Comparison, DiffStats, Difference};
use crate::resolve::{find_occurrences_with, EndpointCanonicalizer, OpenApiPaths};
use crate::tree::Node;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Markup wrapped around each endpoint in the notification text.
pub const EMPHASIS: &str = "*";

/// One reported difference with the endpoints it touches.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub difference: Difference,
    /// Descriptive line for the difference
    pub line: String,
    /// Resolved endpoint references, duplicate-free, in discovery order
    pub endpoints: Vec<String>,
}

/// The report for one host.
#[derive(Debug, Clone)]
pub struct Report {
    pub host: String,
    pub summary: String,
    pub entries: Vec<ReportEntry>,
    pub stats: DiffStats,
    equal: bool,
}

impl Report {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    /// Change lines as sent to the channel: each difference line followed by
    /// its emphasized endpoints.
    pub fn change_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            lines.push(entry.line.clone());
            lines.extend(entry.endpoints.iter().map(|e| emphasize(e)));
        }
        lines
    }

    /// The full notification text: the summary, then the change lines.
    pub fn text(&self) -> String {
        let lines = self.change_lines();
        if lines.is_empty() {
            return self.summary.clone();
        }
        format!("{} {}", self.summary, lines.join("\n"))
    }
}

/// Builds the report for `host` using the OpenAPI endpoint canonicalizer.
pub fn build_report(comparison: &Comparison, new_doc: &Node, host: &str) -> Report {
    build_report_with(comparison, new_doc, host, &OpenApiPaths)
}

/// Like [`build_report`] with an explicit canonicalizer.
pub fn build_report_with(
    comparison: &Comparison,
    new_doc: &Node,
    host: &str,
    canonicalizer: &dyn EndpointCanonicalizer,
) -> Report {
    let stats = comparison.stats();

    if comparison.is_equal() {
        return Report {
            host: host.to_string(),
            summary: format!("JSON objects are equal for: {}", host),
            entries: Vec::new(),
            stats,
            equal: true,
        };
    }

    let entries = comparison
        .differences
        .iter()
        .map(|difference| {
            let seed = update_path(&render_parents(&difference.parents));
            let endpoints = expand_endpoints(new_doc, &seed, canonicalizer);
            debug!(%seed, endpoints = endpoints.len(), "resolved endpoints");
            ReportEntry {
                line: describe(difference),
                endpoints,
                difference: difference.clone(),
            }
        })
        .collect();

    Report {
        host: host.to_string(),
        summary: format!("JSON objects are not equal. Differences: {}\n", host),
        entries,
        stats,
        equal: false,
    }
}

/// Formats the descriptive line for a difference:
/// `<kind> <path> Changed Value: <value> <parents> Changed Endpoints:`.
pub fn describe(difference: &Difference) -> String {
    let kind = difference.kind.map(|k| k.label()).unwrap_or_default();
    let value = difference
        .value
        .as_ref()
        .map(Node::render)
        .unwrap_or_else(|| Node::Null.render());

    format!(
        "{} {} Changed Value: {} {} Changed Endpoints:",
        kind,
        difference.path.trim_start_matches('.'),
        value,
        render_parents(&difference.parents)
    )
}

/// Renders a parent chain as a bracketed, space separated list: `[a b c]`.
pub fn render_parents(parents: &[String]) -> String {
    format!("[{}]", parents.join(" "))
}

/// Derives the seed endpoint reference from a rendered parent chain.
///
/// Strips the surrounding brackets, keeps the first two whitespace separated
/// tokens, joins them with `/` and prefixes `#/`. For Swagger 2 model
/// changes this yields the `$ref` target of the model
/// (`[definitions Pet properties]` becomes `#/definitions/Pet`).
pub fn update_path(rendered_parents: &str) -> String {
    let inner = rendered_parents
        .trim_start_matches('[')
        .trim_end_matches(']');
    let tokens: Vec<&str> = inner.split_whitespace().take(2).collect();
    format!("#/{}", tokens.join("/"))
}

/// Fixed-point endpoint search.
///
/// Starting from `seed`, every candidate is looked up in `doc`. Occurrences
/// other than the candidate itself that have not been seen before become new
/// candidates. A candidate that yields no new candidate is final, which
/// covers references that lead nowhere as well as the members of a
/// reference cycle. Every distinct candidate is expanded at most once, so
/// the search ends after at most one lookup per distinct reference the
/// document can produce.
pub fn expand_endpoints(
    doc: &Node,
    seed: &str,
    canonicalizer: &dyn EndpointCanonicalizer,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::from([seed.to_string()]);
    let mut frontier: VecDeque<String> = VecDeque::from([seed.to_string()]);
    let mut resolved = Vec::new();

    while let Some(candidate) = frontier.pop_front() {
        let mut is_final = true;
        for occurrence in find_occurrences_with(doc, &candidate, "", canonicalizer) {
            if occurrence != candidate && seen.insert(occurrence.clone()) {
                frontier.push_back(occurrence);
                is_final = false;
            }
        }
        if is_final {
            resolved.push(candidate);
        }
    }

    resolved
}

fn emphasize(endpoint: &str) -> String {
    format!("{}{}{}", EMPHASIS, endpoint, EMPHASIS)
}
