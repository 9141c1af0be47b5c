//! Numbered snapshot storage.
//!
//! Each host gets its own directory holding `1.json`, `2.json`, ... One run
//! fetches the current document and stores it under the next number; the
//! two highest numbers are then compared.

use crate::error::{FetchError, SnapshotError, WatchError};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const SNAPSHOT_EXTENSION: &str = "json";

const USER_AGENT: &str = concat!("swagger-watch/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The snapshots involved in one run for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    /// Snapshot stored by the previous run; absent on disk for the first fetch
    pub previous: PathBuf,
    /// Snapshot stored by this run
    pub latest: PathBuf,
    /// Number of the latest snapshot
    pub number: u64,
}

impl SnapshotPair {
    /// Whether there is an earlier snapshot to compare against.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Directory holding the snapshots of `host` below `root`.
pub fn host_dir(root: &Path, host: &str) -> PathBuf {
    root.join(host)
}

pub fn snapshot_path(dir: &Path, number: u64) -> PathBuf {
    dir.join(format!("{}.{}", number, SNAPSHOT_EXTENSION))
}

/// Highest snapshot number found in `dir`.
///
/// The number of a file is the first run of digits in its name. Returns 0
/// when the directory holds no numbered file or cannot be read; the latter
/// is expected on the first run for a host.
pub fn latest_snapshot_number(dir: &Path) -> u64 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            info!(dir = %dir.display(), "no readable snapshot directory: {}", err);
            return 0;
        }
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| snapshot_number(&entry.file_name().to_string_lossy()))
        .max()
        .unwrap_or(0)
}

/// First run of ASCII digits in `file_name`, if it parses.
fn snapshot_number(file_name: &str) -> Option<u64> {
    let start = file_name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = file_name[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Builds the blocking client shared by fetches and notifications.
pub fn http_client() -> Result<Client, FetchError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| FetchError::Client { source })
}

/// Fetches `url` and returns the response body.
///
/// A non-success status is an error; its body is not returned.
pub fn fetch_document(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
}

/// Writes `body` as snapshot `number` in `dir`, creating the directory.
pub fn store_snapshot(dir: &Path, number: u64, body: &[u8]) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir).map_err(|source| SnapshotError::CreateDir {
        path: dir.to_string_lossy().to_string(),
        source,
    })?;

    let path = snapshot_path(dir, number);
    fs::write(&path, body).map_err(|source| SnapshotError::Write {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    Ok(path)
}

/// Fetches the document at `url` and stores it as snapshot `latest + 1`.
///
/// Nothing is fetched when `latest` has no successor.
pub fn fetch_and_store(
    client: &Client,
    url: &str,
    dir: &Path,
    latest: u64,
) -> Result<SnapshotPair, WatchError> {
    let number = latest
        .checked_add(1)
        .ok_or_else(|| SnapshotError::Exhausted {
            path: dir.to_string_lossy().to_string(),
            latest,
        })?;

    debug!(%url, "fetching document");
    let body = fetch_document(client, url)?;

    let stored = store_snapshot(dir, number, &body)?;
    debug!(path = %stored.display(), bytes = body.len(), "stored snapshot");

    Ok(SnapshotPair {
        previous: snapshot_path(dir, latest),
        latest: stored,
        number,
    })
}
