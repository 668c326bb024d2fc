//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub launchd: LaunchdConfig,

    /// Daemon definitions keyed by label.
    #[serde(default)]
    pub daemons: BTreeMap<String, DaemonDefinition>,
}

/// Where descriptors go and how the service manager is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchdConfig {
    /// Directory the `<label>.plist` descriptors are written to.
    #[serde(default = "default_plist_dir")]
    pub plist_dir: PathBuf,

    /// Service-control executable. Resolved on `PATH` when not absolute.
    #[serde(default = "default_launchctl")]
    pub launchctl: PathBuf,
}

impl Default for LaunchdConfig {
    fn default() -> Self {
        Self {
            plist_dir: default_plist_dir(),
            launchctl: default_launchctl(),
        }
    }
}

fn default_plist_dir() -> PathBuf {
    PathBuf::from("/Library/LaunchDaemons")
}

fn default_launchctl() -> PathBuf {
    PathBuf::from("launchctl")
}

/// A daemon as declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonDefinition {
    /// Installed location of the executable.
    pub program: PathBuf,

    /// Invocation vector. Empty means `[program]`.
    #[serde(default)]
    pub program_arguments: Vec<String>,

    #[serde(default = "default_run_at_load")]
    pub run_at_load: bool,

    /// Executable copied to `program` on install.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

fn default_run_at_load() -> bool {
    true
}

impl Config {
    /// Look up a daemon definition by label.
    pub fn daemon(&self, label: &str) -> Option<&DaemonDefinition> {
        self.daemons.get(label)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launchd.plist_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "launchd.plist_dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.launchd.launchctl.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "launchd.launchctl".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        for (label, daemon) in &self.daemons {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "daemons".to_string(),
                    message: "label must not be empty".to_string(),
                });
            }
            if daemon.program.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("daemons.{}.program", label),
                    message: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
