//! # launchkit Daemon
//!
//! Installs and removes launchd daemons.
//!
//! ## Features
//!
//! - Property-list descriptor rendering (`<plist_dir>/<label>.plist`, mode 0644)
//! - Executable installation at the daemon's program path (mode 0700)
//! - `launchctl` load/unload/list/start/stop
//!
//! ## Usage
//!
//! ```rust,ignore
//! use launchkit_daemon::{DaemonSpec, Launchd};
//!
//! let launchd = Launchd::new("/Library/LaunchDaemons");
//! let spec = DaemonSpec::new("org.example.agent", "/usr/local/libexec/org.example.agent")
//!     .program_arguments(vec![
//!         "/usr/local/libexec/org.example.agent".to_string(),
//!         "--serve".to_string(),
//!     ]);
//!
//! launchd.add_daemon(&spec, "./target/release/agent")?;
//! launchd.remove_daemon(&spec)?;
//! ```

pub mod daemon_spec;
pub mod error;

#[cfg(unix)]
pub mod launchd;

// Re-exports
pub use daemon_spec::DaemonSpec;
pub use error::DaemonError;

#[cfg(unix)]
pub use launchd::{Launchctl, Launchd, ServiceControl, render_plist};
