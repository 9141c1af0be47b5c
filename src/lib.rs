//! swagger-watch - change notifications for Swagger/OpenAPI documents.
//!
//! The library fetches the Swagger document of every configured host, keeps
//! numbered snapshots of it on disk, compares the newest snapshot with the
//! previous one and reports which endpoints are affected by the changes.
//!
//! # Example
//!
//! ```
//! use swagger_watch::{build_report, compare, parse_json};
//!
//! let old = parse_json(r##"{
//!     "paths": {"/pet": {"post": {"parameters": [{"schema": {"$ref": "#/definitions/Pet"}}]}}},
//!     "definitions": {"Pet": {"properties": {"name": {"type": "string"}}}}
//! }"##).unwrap();
//! let new = parse_json(r##"{
//!     "paths": {"/pet": {"post": {"parameters": [{"schema": {"$ref": "#/definitions/Pet"}}]}}},
//!     "definitions": {"Pet": {"properties": {"name": {"type": "integer"}}}}
//! }"##).unwrap();
//!
//! let report = build_report(&compare(&old, &new), &new, "petstore.swagger.io");
//! assert_eq!(report.entries[0].endpoints, vec!["#/pet/post"]);
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod notify;
pub mod output;
pub mod parser;
pub mod report;
pub mod resolve;
pub mod snapshot;
pub mod tree;
pub mod watch;

// Re-export commonly used types for convenience
pub use config::{load_config, WatchConfig};
pub use diff::{compare, Comparison, Difference, DifferenceKind};
pub use error::{
    ConfigError, FetchError, NotifyError, OutputError, ParseError, SnapshotError, WatchError,
};
pub use filter::IgnoreRules;
pub use output::{format_report, OutputFormat};
pub use parser::{parse_json, parse_snapshot};
pub use report::{build_report, Report};
pub use resolve::{extract_path, find_occurrences, EndpointCanonicalizer, OpenApiPaths};
pub use tree::Node;
pub use watch::{run, RunOptions, RunSummary};
