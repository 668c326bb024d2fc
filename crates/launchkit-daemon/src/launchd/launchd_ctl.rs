//! `launchctl` invocation.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::DaemonError;

/// Stderr fragments from `load` that mean the daemon is already registered.
const ALREADY_LOADED: &[&str] = &["already loaded"];

/// Stderr fragments from `unload` that mean there was nothing to unload.
const NOT_LOADED: &[&str] = &["not loaded", "Could not find"];

/// Operations on the host service manager.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceControl {
    /// Register the daemon described by `plist`.
    fn load(&self, plist: &Path) -> Result<(), DaemonError>;

    /// Deregister the daemon described by `plist`.
    fn unload(&self, plist: &Path) -> Result<(), DaemonError>;

    /// Labels currently registered.
    fn list(&self) -> Result<Vec<String>, DaemonError>;

    /// Start a registered daemon.
    fn start(&self, label: &str) -> Result<(), DaemonError>;

    /// Stop a running daemon.
    fn stop(&self, label: &str) -> Result<(), DaemonError>;
}

/// [`ServiceControl`] backed by the `launchctl` executable.
#[derive(Debug, Clone)]
pub struct Launchctl {
    program: PathBuf,
}

impl Default for Launchctl {
    fn default() -> Self {
        Self::new("launchctl")
    }
}

impl Launchctl {
    /// Use the given executable instead of `launchctl` from `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable being invoked.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run<I, S>(&self, action: &str, args: I) -> Result<Output, DaemonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.arg(action).args(args);
        tracing::debug!("Running {:?}", command);

        command.output().map_err(|source| DaemonError::ServiceControlSpawn {
            program: self.program.clone(),
            source,
        })
    }

    /// Turn a finished invocation into a result. Non-zero exit or stderr
    /// output is a failure unless stderr matches one of `tolerated`.
    fn check(action: &str, output: &Output, tolerated: &[&str]) -> Result<(), DaemonError> {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !stderr.is_empty() && tolerated.iter().any(|t| stderr.contains(t)) {
            tracing::warn!("launchctl {}: {}", action, stderr);
            return Ok(());
        }

        if output.status.success() && stderr.is_empty() {
            return Ok(());
        }

        Err(DaemonError::ServiceControlFailed {
            action: action.to_string(),
            code: output.status.code(),
            stderr,
        })
    }
}

impl ServiceControl for Launchctl {
    fn load(&self, plist: &Path) -> Result<(), DaemonError> {
        let output = self.run("load", [plist])?;
        Self::check("load", &output, ALREADY_LOADED)?;
        tracing::info!("Loaded {}", plist.display());
        Ok(())
    }

    fn unload(&self, plist: &Path) -> Result<(), DaemonError> {
        let output = self.run("unload", [plist])?;
        Self::check("unload", &output, NOT_LOADED)?;
        tracing::info!("Unloaded {}", plist.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, DaemonError> {
        let output = self.run("list", std::iter::empty::<&str>())?;
        Self::check("list", &output, &[])?;
        Ok(parse_list_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn start(&self, label: &str) -> Result<(), DaemonError> {
        let output = self.run("start", [label])?;
        Self::check("start", &output, &[])?;
        tracing::info!("Started {}", label);
        Ok(())
    }

    fn stop(&self, label: &str) -> Result<(), DaemonError> {
        let output = self.run("stop", [label])?;
        Self::check("stop", &output, &[])?;
        tracing::info!("Stopped {}", label);
        Ok(())
    }
}

/// Parse the `PID  Status  Label` table printed by `launchctl list`.
pub(super) fn parse_list_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let pid = columns.next()?;
            let label = columns.nth(1)?;
            (pid != "PID").then(|| label.to_string())
        })
        .collect()
}
