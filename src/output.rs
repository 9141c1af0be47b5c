//! Report rendering.
//!
//! The plain format is the exact text posted to the chat channel. The
//! terminal format adds colors for reading a dry run, and the JSON format
//! exposes the same data for scripting.
//!
//! # Examples
//!
//! ```
//! use swagger_watch::diff::compare;
//! use swagger_watch::output::{format_report, OutputFormat};
//! use swagger_watch::parser::parse_json;
//! use swagger_watch::report::build_report;
//!
//! let old = parse_json(r#"{"b": 2}"#).unwrap();
//! let new = parse_json(r#"{"b": 3}"#).unwrap();
//! let report = build_report(&compare(&old, &new), &new, "h");
//!
//! let text = format_report(&report, OutputFormat::Plain).unwrap();
//! assert!(text.starts_with("JSON objects are not equal"));
//! ```

use crate::diff::{DiffStats, DifferenceKind};
use crate::error::OutputError;
use crate::report::{render_parents, Report, ReportEntry};
use colored::*;
use serde_json::json;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the report
    Json,
    /// The notification text, unchanged
    Plain,
}

/// Formats a report according to `format`.
pub fn format_report(report: &Report, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_terminal(report)),
        OutputFormat::Json => format_json(report),
        OutputFormat::Plain => Ok(report.text()),
    }
}

fn format_terminal(report: &Report) -> String {
    if report.is_equal() {
        return report.summary.green().to_string();
    }

    let mut output = String::new();
    output.push_str(&report.summary.trim_end().bold().to_string());
    output.push('\n');

    for entry in &report.entries {
        output.push_str(&format_entry_terminal(entry));
        output.push('\n');
        for endpoint in &entry.endpoints {
            output.push_str(&format!("    {}\n", endpoint.cyan().bold()));
        }
    }

    output.push('\n');
    output.push_str(&format_summary(&report.stats));
    output
}

fn format_entry_terminal(entry: &ReportEntry) -> String {
    match entry.difference.kind {
        Some(DifferenceKind::Addition) => format!("{} {}", "+".bright_green(), entry.line.green()),
        Some(DifferenceKind::Deletion) => format!("{} {}", "-".bright_red(), entry.line.red()),
        Some(DifferenceKind::Modification) => {
            format!("{} {}", "•".bright_yellow(), entry.line.yellow())
        }
        None => format!("{} {}", "≠".dimmed(), entry.line.trim_start().dimmed()),
    }
}

fn format_json(report: &Report) -> Result<String, OutputError> {
    let changes: Vec<serde_json::Value> = report
        .entries
        .iter()
        .map(|entry| {
            let difference = &entry.difference;
            json!({
                "kind": difference.kind.map(|k| k.label().to_lowercase()),
                "path": difference.path,
                "parents": render_parents(&difference.parents),
                "value": difference.value.as_ref().map(|v| v.to_json_value()),
                "endpoints": entry.endpoints,
            })
        })
        .collect();

    let output = json!({
        "host": report.host,
        "equal": report.is_equal(),
        "summary": report.summary.trim_end(),
        "changes": changes,
        "stats": report.stats,
    });

    serde_json::to_string_pretty(&output)
        .map_err(|source| OutputError::JsonSerializationError { source })
}

/// One-line count of the differences in a report.
pub fn format_summary(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "Summary: No changes".to_string();
    }

    let counts = [
        (stats.additions, "added"),
        (stats.deletions, "removed"),
        (stats.modifications, "modified"),
        (stats.length_mismatches, "resized arrays"),
        (stats.kind_mismatches, "retyped"),
    ];
    let parts: Vec<String> = counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

    format!("Summary: {}", parts.join(", "))
}
