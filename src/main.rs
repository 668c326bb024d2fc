//! launchkit - install and remove launchd daemons.
//!
//! Main entry point for the launchkit CLI.

mod adapters;
mod cli;
#[cfg(unix)]
mod cmd_daemon;

use clap::Parser;
use tracing::error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapters::{launchkit_dir, load_config};
use crate::cli::Cli;

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr so `render` and `list` stay pipeable.
/// With `file_logging`, log files are written to ~/.launchkit/logs/ with
/// daily rotation.
fn init_tracing(file_logging: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file = if file_logging {
        let log_dir = launchkit_dir().join("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("launchkit")
            .filename_suffix("log")
            .max_log_files(14)
            .build(&log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keeps the background writer alive for the whole process.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(!cli.command.is_read_only())?;

    let config = load_config(cli.config.as_deref(), cli.plist_dir, cli.launchctl)?;

    #[cfg(unix)]
    let result = cmd_daemon::handle_command(cli.command, &config);

    #[cfg(not(unix))]
    let result: Result<(), Box<dyn std::error::Error>> = {
        let _ = (cli.command, config);
        Err("launchd daemons are only supported on Unix hosts".into())
    };

    if let Err(ref e) = result {
        error!("{}", e);
    }
    result
}
