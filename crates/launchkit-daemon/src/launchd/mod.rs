//! launchd daemon management.
//!
//! Renders property-list descriptors, installs executables and drives
//! `launchctl` to register and deregister daemons.

mod launchd_ctl;
mod launchd_installer;
mod launchd_plist;

pub use launchd_ctl::{Launchctl, ServiceControl};
pub use launchd_installer::Launchd;
pub use launchd_plist::render_plist;

#[cfg(test)]
pub(crate) use launchd_ctl::MockServiceControl;

#[cfg(test)]
#[path = "launchd_tests.rs"]
mod tests;
