//! One watch run over all configured hosts.
//!
//! Hosts are processed one after another. For each host the current
//! document is fetched and stored as the next snapshot; when an earlier
//! snapshot exists the two are compared, the differences are turned into a
//! report and the report is posted to the configured channel.
//!
//! A failure while processing one host is recorded in the [`RunSummary`]
//! and the run moves on to the next host.

use crate::config::WatchConfig;
use crate::diff::compare;
use crate::error::WatchError;
use crate::filter::{apply_ignore_rules, IgnoreRules};
use crate::notify::notify;
use crate::parser::parse_snapshot;
use crate::report::{build_report, Report};
use crate::snapshot::{fetch_and_store, host_dir, http_client, latest_snapshot_number, SnapshotPair};
use reqwest::blocking::Client;
use std::path::PathBuf;
use tracing::{error, info};

/// Options that are not part of the watch configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory holding one snapshot directory per host
    pub snapshot_root: PathBuf,
    /// Build reports but do not post them
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            snapshot_root: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// What happened for a host that was processed successfully.
#[derive(Debug)]
pub enum HostOutcome {
    /// First snapshot for the host; nothing to compare
    Baseline { snapshot: PathBuf },
    /// Latest two snapshots compared
    Compared { report: Report, notified: bool },
}

#[derive(Debug)]
pub struct HostResult {
    pub host: String,
    pub outcome: Result<HostOutcome, WatchError>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<HostResult>,
}

impl RunSummary {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &WatchError)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Err(err) => Some((r.host.as_str(), err)),
            Ok(_) => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Ok(HostOutcome::Compared { report, .. }) => Some(report),
            _ => None,
        })
    }
}

/// Processes every configured host in order.
///
/// Only a failure to set up the HTTP client aborts the run; per-host
/// failures are logged and collected.
pub fn run(config: &WatchConfig, options: &RunOptions) -> Result<RunSummary, WatchError> {
    let client = http_client()?;
    let rules = config.ignore_rules();
    let mut summary = RunSummary::default();

    info!(name = %config.name, hosts = config.hosts.len(), "starting watch run");

    for host in &config.hosts {
        let outcome = process_host(&client, config, &rules, host, options);
        if let Err(err) = &outcome {
            error!(%host, "host failed: {}", err);
        }
        summary.results.push(HostResult {
            host: host.clone(),
            outcome,
        });
    }

    Ok(summary)
}

/// Fetches, stores, compares and notifies for a single host.
pub fn process_host(
    client: &Client,
    config: &WatchConfig,
    rules: &IgnoreRules,
    host: &str,
    options: &RunOptions,
) -> Result<HostOutcome, WatchError> {
    let dir = host_dir(&options.snapshot_root, host);
    let latest = latest_snapshot_number(&dir);
    let pair = fetch_and_store(client, &config.document_url(host), &dir, latest)?;

    if !pair.has_previous() {
        info!(%host, "nothing to compare");
        return Ok(HostOutcome::Baseline {
            snapshot: pair.latest,
        });
    }

    let report = compare_snapshots(&pair, host, rules)?;
    info!(
        %host,
        equal = report.is_equal(),
        changes = report.entries.len(),
        "compared snapshots {} and {}",
        pair.number - 1,
        pair.number
    );

    if options.dry_run {
        return Ok(HostOutcome::Compared {
            report,
            notified: false,
        });
    }

    notify(client, &report.text(), &config.webhook, &config.channel)?;
    Ok(HostOutcome::Compared {
        report,
        notified: true,
    })
}

/// Compares the two snapshots of `pair` and builds the report for `host`.
pub fn compare_snapshots(
    pair: &SnapshotPair,
    host: &str,
    rules: &IgnoreRules,
) -> Result<Report, WatchError> {
    let old = parse_snapshot(&pair.previous)?;
    let new = parse_snapshot(&pair.latest)?;

    let comparison = apply_ignore_rules(&compare(&old, &new), rules);
    Ok(build_report(&comparison, &new, host))
}
