//! CLI argument definitions for launchkit.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// launchkit CLI.
#[derive(Parser)]
#[command(name = "launchkit")]
#[command(about = "Install and remove launchd daemons")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.launchkit/config.toml)
    #[arg(short, long, global = true, env = "LAUNCHKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Descriptor directory, overrides `launchd.plist_dir`
    #[arg(long, global = true)]
    pub plist_dir: Option<PathBuf>,

    /// launchctl executable, overrides `launchd.launchctl`
    #[arg(long, global = true)]
    pub launchctl: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write the descriptor, install the binary and load the daemon
    Add {
        /// Daemon label
        label: String,

        #[command(flatten)]
        spec: SpecArgs,

        /// Executable to install at the program path
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Unload the daemon and delete its descriptor and binary
    Remove {
        /// Daemon label
        label: String,

        /// Installed program path
        #[arg(long)]
        program: Option<PathBuf>,
    },

    /// Print the descriptor without touching the system
    Render {
        /// Daemon label
        label: String,

        #[command(flatten)]
        spec: SpecArgs,
    },

    /// List labels registered with launchd
    List {
        /// Print a JSON array instead of one label per line
        #[arg(long)]
        json: bool,
    },

    /// Show whether a daemon is installed and loaded
    Status {
        /// Daemon label
        label: String,
    },

    /// Start a loaded daemon
    Start {
        /// Daemon label
        label: String,
    },

    /// Stop a running daemon
    Stop {
        /// Daemon label
        label: String,
    },
}

impl Commands {
    /// Commands that only read state. These skip the log file so `--help`,
    /// `render` and queries leave nothing behind in `~/.launchkit`.
    pub(crate) fn is_read_only(&self) -> bool {
        matches!(
            self,
            Commands::Render { .. } | Commands::List { .. } | Commands::Status { .. }
        )
    }
}

/// Daemon fields that override the config file entry.
#[derive(Args, Debug, Default)]
pub(crate) struct SpecArgs {
    /// Installed program path
    #[arg(long)]
    pub program: Option<PathBuf>,

    /// Argument passed after the program path (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Do not start the daemon when it is loaded
    #[arg(long)]
    pub no_run_at_load: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "launchkit",
            "add",
            "org.x.d",
            "--program",
            "/tmp/bin/org.x.d",
            "--source",
            "./target/release/d",
            "--arg",
            "--verbose",
            "--arg",
            "serve",
            "--no-run-at-load",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { label, spec, source } => {
                assert_eq!(label, "org.x.d");
                assert_eq!(spec.program, Some(PathBuf::from("/tmp/bin/org.x.d")));
                assert_eq!(spec.args, vec!["--verbose", "serve"]);
                assert!(spec.no_run_at_load);
                assert_eq!(source, Some(PathBuf::from("./target/release/d")));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "launchkit",
            "list",
            "--plist-dir",
            "/tmp/plists",
            "--launchctl",
            "/tmp/fake-launchctl",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.plist_dir, Some(PathBuf::from("/tmp/plists")));
        assert_eq!(cli.launchctl, Some(PathBuf::from("/tmp/fake-launchctl")));
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn test_parse_requires_label() {
        assert!(Cli::try_parse_from(["launchkit", "remove"]).is_err());
    }

    #[test]
    fn test_read_only_commands() {
        let read_only = |args: &[&str]| {
            Cli::try_parse_from(args).unwrap().command.is_read_only()
        };

        assert!(read_only(&["launchkit", "render", "org.x.d", "--program", "/tmp/d"]));
        assert!(read_only(&["launchkit", "list", "--json"]));
        assert!(read_only(&["launchkit", "status", "org.x.d"]));
        assert!(!read_only(&["launchkit", "add", "org.x.d"]));
        assert!(!read_only(&["launchkit", "remove", "org.x.d"]));
        assert!(!read_only(&["launchkit", "start", "org.x.d"]));
        assert!(!read_only(&["launchkit", "stop", "org.x.d"]));
    }
}
