//! Daemon installation errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while installing or removing a daemon.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The executable to install could not be read.
    #[error("Failed to read source executable {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The launchd descriptor could not be written.
    #[error("Failed to write descriptor {path}: {source}")]
    DescriptorWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The executable could not be installed at its program path.
    #[error("Failed to install binary at {path}: {source}")]
    BinaryInstall {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The launchd descriptor could not be deleted.
    #[error("Failed to remove descriptor {path}: {source}")]
    DescriptorRemoval {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The installed executable could not be deleted.
    #[error("Failed to remove binary {path}: {source}")]
    BinaryRemoval {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The service-control executable could not be run at all.
    #[error("Failed to execute {program}: {source}")]
    ServiceControlSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The service-control executable ran and reported a failure.
    #[error("launchctl {action} failed ({}): {stderr}", describe_exit(.code))]
    ServiceControlFailed {
        action: String,
        code: Option<i32>,
        stderr: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl From<launchkit_config::ConfigError> for DaemonError {
    fn from(err: launchkit_config::ConfigError) -> Self {
        DaemonError::Config(err.to_string())
    }
}
