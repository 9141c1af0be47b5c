//! Ignore rules for noisy document locations.
//!
//! Some fields change on every publish without affecting any endpoint
//! (`info.version`, build timestamps). Hosts can list glob-style patterns
//! for them; differences whose location matches are dropped before a
//! report is built.
//!
//! # Pattern Syntax
//!
//! - `foo` - matches literal segment "foo"
//! - `*` - matches any single segment
//! - `**` - matches any number of segments (including zero)
//! - `info.version` - matches the nested location `info.version`
//! - `**.x-generated-at` - matches `x-generated-at` at any depth
//! - `paths./v1\.0/pets.*` - `\.` is a literal dot inside a segment, for
//!   keys such as `/v1.0/pets`; `\\` is a literal backslash
//!
//! # Examples
//!
//! ```
//! use swagger_watch::filter::PathPattern;
//!
//! let pattern = PathPattern::parse("paths.*.*.x-internal");
//! assert!(pattern.matches(&["paths", "/pet", "get", "x-internal"]));
//! assert!(!pattern.matches(&["paths", "/pet", "x-internal"]));
//! ```

use crate::diff::Comparison;

/// A single segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    /// `*`
    AnyOne,
    /// `**`
    AnyMany,
}

/// A compiled pattern matched against difference locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub segments: Vec<PatternSegment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .into_iter()
            .map(|segment| match segment.as_str() {
                "**" => PatternSegment::AnyMany,
                "*" => PatternSegment::AnyOne,
                _ => PatternSegment::Literal(segment),
            })
            .collect();
        Self { segments }
    }

    pub fn matches<S: AsRef<str>>(&self, location: &[S]) -> bool {
        match_segments(&self.segments, location)
    }
}

/// Splits on unescaped dots. A backslash makes the next character literal.
fn split_segments(pattern: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

fn match_segments<S: AsRef<str>>(pattern: &[PatternSegment], location: &[S]) -> bool {
    match (pattern, location) {
        ([], []) => true,
        ([], _) => false,
        ([PatternSegment::AnyMany, rest @ ..], _) => {
            match_segments(rest, location)
                || (!location.is_empty() && match_segments(pattern, &location[1..]))
        }
        (_, []) => false,
        ([PatternSegment::AnyOne, rest @ ..], [_, tail @ ..]) => match_segments(rest, tail),
        ([PatternSegment::Literal(literal), rest @ ..], [head, tail @ ..]) => {
            literal == head.as_ref() && match_segments(rest, tail)
        }
    }
}

/// The set of ignore patterns configured for a host.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    pub patterns: Vec<PathPattern>,
}

impl IgnoreRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| PathPattern::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.patterns.push(PathPattern::parse(pattern));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored<S: AsRef<str>>(&self, location: &[S]) -> bool {
        self.patterns.iter().any(|p| p.matches(location))
    }
}

/// Drops the differences whose location matches one of the rules.
///
/// Kind mismatches carry no location and are kept.
pub fn apply_ignore_rules(comparison: &Comparison, rules: &IgnoreRules) -> Comparison {
    if rules.is_empty() {
        return comparison.clone();
    }

    Comparison {
        differences: comparison
            .differences
            .iter()
            .filter(|d| !rules.is_ignored(&d.location()))
            .cloned()
            .collect(),
        kind_mismatches: comparison.kind_mismatches,
        root_kind_mismatch: comparison.root_kind_mismatch,
    }
}
