//! Controller configuration.
//!
//! Configuration is read from an optional YAML file; every field has a
//! default so an empty file (or no file) is valid.
//!
//! ```yaml
//! link_port_learning: suppress
//! event_queue_depth: 4096
//! batch_size: 64
//! rebuild_on_disconnect: true
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`StpConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value parsed but is out of range.
    #[error("Invalid configuration for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    /// Creates an invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// What to do with an unknown packet source seen on a port that faces
/// another switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPortLearning {
    /// Learn and propagate like any other port.
    #[default]
    Propagate,
    /// Ignore it; the switch the host is attached to will report it.
    Suppress,
}

impl fmt::Display for LinkPortLearning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkPortLearning::Propagate => write!(f, "propagate"),
            LinkPortLearning::Suppress => write!(f, "suppress"),
        }
    }
}

impl FromStr for LinkPortLearning {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(LinkPortLearning::Propagate),
            "suppress" => Ok(LinkPortLearning::Suppress),
            _ => Err(ConfigError::invalid(
                "link_port_learning",
                format!("expected 'propagate' or 'suppress', got '{}'", s),
            )),
        }
    }
}

/// Spanning-tree controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StpConfig {
    /// Policy for packet sources seen on switch-facing ports
    pub link_port_learning: LinkPortLearning,
    /// Capacity of the daemon's inbound event channel
    pub event_queue_depth: usize,
    /// Events the daemon takes off its channel and handles per `do_task()` pass
    pub batch_size: usize,
    /// Recompute the tree after a switch disconnects
    pub rebuild_on_disconnect: bool,
}

impl Default for StpConfig {
    fn default() -> Self {
        Self {
            link_port_learning: LinkPortLearning::Propagate,
            event_queue_depth: 1024,
            batch_size: 128,
            rebuild_on_disconnect: true,
        }
    }
}

impl StpConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty map.
        let config: StpConfig = if yaml.trim().is_empty() {
            StpConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_queue_depth == 0 {
            return Err(ConfigError::invalid("event_queue_depth", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batch_size", "must be at least 1"));
        }
        Ok(())
    }
}
