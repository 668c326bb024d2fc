//! Daemon installation and removal.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use launchkit_config::LaunchdConfig;
use tempfile::NamedTempFile;

use super::launchd_plist::render_plist;
use super::{Launchctl, ServiceControl};
use crate::daemon_spec::DaemonSpec;
use crate::error::DaemonError;

const PLIST_MODE: u32 = 0o644;
const BINARY_MODE: u32 = 0o700;

/// launchd daemon installer.
///
/// Writes descriptors into `plist_dir` and drives the service manager
/// through a [`ServiceControl`].
#[derive(Debug)]
pub struct Launchd<C = Launchctl> {
    plist_dir: PathBuf,
    control: C,
}

impl Launchd<Launchctl> {
    /// Installer using `launchctl` from `PATH`.
    pub fn new(plist_dir: impl Into<PathBuf>) -> Self {
        Self::with_control(plist_dir, Launchctl::default())
    }

    /// Installer configured from the `[launchd]` config section.
    pub fn from_config(config: &LaunchdConfig) -> Self {
        Self::with_control(
            config.plist_dir.clone(),
            Launchctl::new(config.launchctl.clone()),
        )
    }
}

impl<C: ServiceControl> Launchd<C> {
    /// Installer using a custom service-control implementation.
    pub fn with_control(plist_dir: impl Into<PathBuf>, control: C) -> Self {
        Self {
            plist_dir: plist_dir.into(),
            control,
        }
    }

    pub fn plist_dir(&self) -> &Path {
        &self.plist_dir
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Descriptor path for a label: `<plist_dir>/<label>.plist`.
    pub fn plist_path(&self, label: &str) -> PathBuf {
        self.plist_dir.join(format!("{}.plist", label))
    }

    /// Install a daemon.
    ///
    /// Writes the descriptor (mode 0644), copies `source` to `spec.program`
    /// (mode 0700), then loads the descriptor. Earlier steps are not undone
    /// when a later one fails. A program path that is not valid UTF-8 cannot
    /// be written into the descriptor and fails before anything is touched.
    pub fn add_daemon(&self, spec: &DaemonSpec, source: impl AsRef<Path>) -> Result<(), DaemonError> {
        let plist_path = self.plist_path(&spec.label);
        if spec.program.to_str().is_none() {
            return Err(DaemonError::DescriptorWrite {
                path: plist_path,
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("program path {:?} is not valid UTF-8", spec.program),
                ),
            });
        }
        write_descriptor(&plist_path, &render_plist(spec))?;
        tracing::info!("Wrote descriptor for {} at {}", spec.label, plist_path.display());

        install_binary(source.as_ref(), &spec.program)?;
        tracing::info!(
            "Installed {} from {}",
            spec.program.display(),
            source.as_ref().display()
        );

        self.control.load(&plist_path)?;
        tracing::info!("Daemon {} installed", spec.label);
        Ok(())
    }

    /// Remove a daemon.
    ///
    /// Unloads the descriptor, then deletes it and the installed binary.
    /// Files that are already gone count as removed, and a missing
    /// descriptor skips the unload. Stops at the first failure.
    pub fn remove_daemon(&self, spec: &DaemonSpec) -> Result<(), DaemonError> {
        let plist_path = self.plist_path(&spec.label);

        if plist_path.exists() {
            self.control.unload(&plist_path)?;
        } else {
            tracing::debug!("No descriptor at {}, skipping unload", plist_path.display());
        }

        remove_if_exists(&plist_path).map_err(|source| DaemonError::DescriptorRemoval {
            path: plist_path.clone(),
            source,
        })?;

        remove_if_exists(&spec.program).map_err(|source| DaemonError::BinaryRemoval {
            path: spec.program.clone(),
            source,
        })?;

        tracing::info!("Daemon {} removed", spec.label);
        Ok(())
    }

    /// Whether both the descriptor and the binary are on disk.
    pub fn is_installed(&self, spec: &DaemonSpec) -> bool {
        self.plist_path(&spec.label).exists() && spec.program.exists()
    }

    /// Labels currently registered with the service manager.
    pub fn loaded_labels(&self) -> Result<Vec<String>, DaemonError> {
        self.control.list()
    }

    /// Whether the service manager reports `label` as registered.
    pub fn is_loaded(&self, label: &str) -> Result<bool, DaemonError> {
        Ok(self.loaded_labels()?.iter().any(|l| l == label))
    }

    pub fn start(&self, label: &str) -> Result<(), DaemonError> {
        self.control.start(label)
    }

    pub fn stop(&self, label: &str) -> Result<(), DaemonError> {
        self.control.stop(label)
    }
}

fn write_descriptor(path: &Path, content: &str) -> Result<(), DaemonError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        fs::set_permissions(path, fs::Permissions::from_mode(PLIST_MODE))
    };

    write().map_err(|source| DaemonError::DescriptorWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn install_binary(source: &Path, dest: &Path) -> Result<(), DaemonError> {
    let contents = fs::read(source).map_err(|e| DaemonError::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    })?;

    // Staged next to the destination and renamed over it, so a copy that is
    // currently running keeps its old inode.
    let install = || -> io::Result<()> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&contents)?;
        staged.as_file().sync_all()?;
        fs::set_permissions(staged.path(), fs::Permissions::from_mode(BINARY_MODE))?;
        staged.persist(dest).map_err(|e| e.error)?;
        Ok(())
    };

    install().map_err(|source| DaemonError::BinaryInstall {
        path: dest.to_path_buf(),
        source,
    })
}

/// Delete a file, treating "not found" as done.
fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} already absent", path.display());
            Ok(())
        }
        Err(e) => Err(e),
    }
}
