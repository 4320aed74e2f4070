//! Reconciler configuration

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tag written on every constraint created by a declarative pass
pub const DEFAULT_IDENTIFIER: &str = "layout-reconcile";

/// Stale entries evicted from a scope when at least this many go stale at once
pub const DEFAULT_STALE_EVICTION_THRESHOLD: usize = 10;

/// Configuration options for reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Identifier tagging declaratively managed constraints
    pub identifier: String,

    /// Number of stale entries in one pass that triggers eviction instead
    /// of plain deactivation
    pub stale_eviction_threshold: usize,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    identifier: Option<String>,
    stale_eviction_threshold: Option<usize>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_IDENTIFIER.to_string(),
            stale_eviction_threshold: DEFAULT_STALE_EVICTION_THRESHOLD,
        }
    }
}

impl ReconcileConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier tag
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the stale eviction threshold
    pub fn with_stale_eviction_threshold(mut self, threshold: usize) -> Self {
        self.stale_eviction_threshold = threshold;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(ReconcileConfig {
            identifier: parsed.identifier.unwrap_or(defaults.identifier),
            stale_eviction_threshold: parsed
                .stale_eviction_threshold
                .unwrap_or(defaults.stale_eviction_threshold),
        })
    }
}
