//! Watch configuration.
//!
//! The configuration is a single record read once at startup. YAML is the
//! usual format; TOML and JSON are accepted as well and picked by file
//! extension.
//!
//! ```yaml
//! name: petstore
//! path: /v2/swagger.json
//! https: true
//! hosts:
//!   - petstore.swagger.io
//! slack-webhook: https://hooks.slack.com/services/T000/B000/XXXX
//! slack-channel: "#api-changes"
//! ignore:
//!   - info.version
//! ```

use crate::error::ConfigError;
use crate::filter::IgnoreRules;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Name of the watched API, used in log output
    pub name: String,
    /// URL path of the Swagger document on each host, e.g. `/v2/swagger.json`
    #[serde(default)]
    pub path: String,
    /// Fetch over https instead of http
    #[serde(default)]
    pub https: bool,
    /// Hostnames (optionally with port); duplicates are collapsed
    pub hosts: IndexSet<String>,
    /// Incoming webhook URL of the chat channel
    #[serde(rename = "slack-webhook", alias = "webhook", default)]
    pub webhook: String,
    /// Channel the notification is posted to
    #[serde(rename = "slack-channel", alias = "channel", default)]
    pub channel: String,
    /// Location patterns whose differences are not reported
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl WatchConfig {
    pub fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// URL of the Swagger document on `host`.
    pub fn document_url(&self, host: &str) -> String {
        format!("{}://{}{}", self.scheme(), host, self.path)
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::from_patterns(&self.ignore)
    }

    /// Checks the fields serde cannot. A webhook is only required when
    /// notifications are actually sent.
    pub fn validate(&self, require_webhook: bool) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::invalid("hosts must not be empty"));
        }
        if let Some(host) = self.hosts.iter().find(|h| h.trim().is_empty() || h.contains('/')) {
            return Err(ConfigError::invalid(format!(
                "host {:?} must be a bare hostname",
                host
            )));
        }
        if !self.path.is_empty() && !self.path.starts_with('/') {
            return Err(ConfigError::invalid(format!(
                "path {:?} must start with '/'",
                self.path
            )));
        }
        if require_webhook && self.webhook.trim().is_empty() {
            return Err(ConfigError::invalid("slack-webhook must be set"));
        }
        Ok(())
    }
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detects the format from the file extension; anything unknown is YAML.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Reads and parses the config file at `path`.
///
/// Validation is left to the caller, see [`WatchConfig::validate`].
pub fn load_config(path: &Path) -> Result<WatchConfig, ConfigError> {
    let display = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ConfigError::not_found(display));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;

    parse_config(&content, ConfigFormat::from_path(path), &display)
}

/// Parses config text in the given format. `origin` names the source in errors.
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
    origin: &str,
) -> Result<WatchConfig, ConfigError> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        }),
        ConfigFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: origin.to_string(),
            source,
        }),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: origin.to_string(),
            source,
        }),
    }
}
