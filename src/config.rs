//! Configuration file support for openlcs.
//!
//! Provides YAML-based configuration through `openlcs.config.yml` files,
//! including data structures, file loading, and validation. Values given on
//! the command line take precedence over the file.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use openlcs::compliance::policies::{FailurePolicy, ProvidesDisambiguation};
use openlcs::shared::error::OpenlcsError;
use openlcs::shared::Result;

pub const CONFIG_FILENAME: &str = "openlcs.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub task_flow: Option<String>,
    pub dispatcher: Option<DispatcherConfig>,
    pub batch: Option<BatchConfig>,
    pub provides_disambiguation: Option<ProvidesDisambiguation>,
    pub log_level: Option<String>,
    pub owner_id: Option<u64>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Where the Flower API lives
#[derive(Debug, Deserialize, Default)]
pub struct DispatcherConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BatchConfig {
    pub failure_policy: Option<FailurePolicy>,
    pub max_in_flight: Option<usize>,
}

impl ConfigFile {
    pub fn dispatcher_url(&self) -> Option<&str> {
        self.dispatcher.as_ref().and_then(|d| d.url.as_deref())
    }

    pub fn dispatcher_timeout_secs(&self) -> Option<u64> {
        self.dispatcher.as_ref().and_then(|d| d.timeout_secs)
    }

    pub fn failure_policy(&self) -> Option<FailurePolicy> {
        self.batch.as_ref().and_then(|b| b.failure_policy)
    }

    pub fn max_in_flight(&self) -> Option<usize> {
        self.batch.as_ref().and_then(|b| b.max_in_flight)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn config_error(message: impl Into<String>) -> anyhow::Error {
    OpenlcsError::ConfigError {
        message: message.into(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(task_flow) = &config.task_flow {
        if task_flow.trim().is_empty() {
            return Err(config_error(
                "task_flow must not be empty.\n\n💡 Hint: Remove the field to use flow.tasks.flow_default.",
            ));
        }
    }

    if let Some(url) = config.dispatcher_url() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(config_error(format!(
                "dispatcher.url must be an http(s) url, got '{}'.\n\n💡 Hint: Point it at the Flower API, e.g. http://localhost:5555",
                url
            )));
        }
    }

    if config.dispatcher_timeout_secs() == Some(0) {
        return Err(config_error("dispatcher.timeout_secs must be greater than 0."));
    }

    if config.max_in_flight() == Some(0) {
        return Err(config_error("batch.max_in_flight must be greater than 0."));
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
pub fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
    }
}
