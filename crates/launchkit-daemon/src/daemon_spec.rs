//! Daemon specification.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use launchkit_config::DaemonDefinition;

/// What launchd needs to know to run a daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonSpec {
    /// Registration key, also the descriptor file stem.
    pub label: String,

    /// Where the executable lives once installed.
    ///
    /// Must be valid UTF-8: the descriptor embeds it as a string, and
    /// `Launchd::add_daemon` rejects other paths with `DescriptorWrite`.
    /// [`DaemonSpec::new`] derives the default argument vector lossily.
    pub program: PathBuf,

    /// Invocation vector, passed to launchd verbatim.
    pub program_arguments: Vec<String>,

    /// Start the daemon as soon as it is loaded.
    pub run_at_load: bool,
}

impl DaemonSpec {
    /// Create a spec whose argument vector is just the program path.
    pub fn new(label: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self {
            label: label.into(),
            program_arguments: vec![program.to_string_lossy().into_owned()],
            program,
            run_at_load: true,
        }
    }

    /// Build a spec from a config file entry.
    pub fn from_definition(label: impl Into<String>, definition: &DaemonDefinition) -> Self {
        let spec = Self::new(label, definition.program.clone()).run_at_load(definition.run_at_load);
        if definition.program_arguments.is_empty() {
            spec
        } else {
            spec.program_arguments(definition.program_arguments.clone())
        }
    }

    /// Replace the argument vector.
    pub fn program_arguments(mut self, args: Vec<String>) -> Self {
        self.program_arguments = args;
        self
    }

    /// Set whether the daemon starts on load.
    pub fn run_at_load(mut self, run_at_load: bool) -> Self {
        self.run_at_load = run_at_load;
        self
    }
}
