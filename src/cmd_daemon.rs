//! Daemon subcommand handlers for launchkit.

use std::path::PathBuf;

use tracing::{info, warn};

use launchkit_config::Config;
use launchkit_daemon::{DaemonSpec, Launchd, render_plist};

use crate::adapters::{resolve_source, resolve_spec};
use crate::cli::Commands;

/// Handle a subcommand.
pub(crate) fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let launchd = Launchd::from_config(&config.launchd);

    match command {
        Commands::Add { label, spec, source } => {
            let spec = resolve_spec(config, &label, &spec)?;
            let source = resolve_source(config, &label, source)?;
            daemon_add(&launchd, &spec, source)
        }
        Commands::Remove { label, program } => {
            let spec = match program {
                Some(program) => DaemonSpec::new(&label, program),
                None => resolve_spec(config, &label, &Default::default())?,
            };
            daemon_remove(&launchd, &spec)
        }
        Commands::Render { label, spec } => {
            let spec = resolve_spec(config, &label, &spec)?;
            print!("{}", render_plist(&spec));
            Ok(())
        }
        Commands::List { json } => daemon_list(&launchd, json),
        Commands::Status { label } => daemon_status(&launchd, config, &label),
        Commands::Start { label } => {
            launchd.start(&label)?;
            println!("Started {}", label);
            Ok(())
        }
        Commands::Stop { label } => {
            launchd.stop(&label)?;
            println!("Stopped {}", label);
            Ok(())
        }
    }
}

/// Install and load a daemon.
fn daemon_add(
    launchd: &Launchd,
    spec: &DaemonSpec,
    source: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    if launchd.is_installed(spec) {
        warn!("{} already installed, reinstalling", spec.label);
    }

    launchd.add_daemon(spec, &source)?;
    info!("Successfully installed daemon: {}", spec.label);

    println!("Installed {}", spec.label);
    println!("  Descriptor: {}", launchd.plist_path(&spec.label).display());
    println!("  Program:    {}", spec.program.display());
    println!("\nManual control:");
    println!("  Status: launchctl list | grep {}", spec.label);
    println!("  Remove: launchkit remove {}", spec.label);

    Ok(())
}

/// Unload and delete a daemon.
fn daemon_remove(launchd: &Launchd, spec: &DaemonSpec) -> Result<(), Box<dyn std::error::Error>> {
    if !launchd.is_installed(spec) {
        info!("{} not fully installed, removing what is left", spec.label);
    }

    launchd.remove_daemon(spec)?;
    info!("Successfully removed daemon: {}", spec.label);
    println!("Removed {}", spec.label);

    Ok(())
}

/// Print labels registered with launchd.
fn daemon_list(launchd: &Launchd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let labels = launchd.loaded_labels()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&labels)?);
    } else {
        for label in labels {
            println!("{}", label);
        }
    }

    Ok(())
}

/// Print installation and registration state for a label.
fn daemon_status(
    launchd: &Launchd,
    config: &Config,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let plist_path = launchd.plist_path(label);
    let loaded = launchd.is_loaded(label)?;

    println!("Daemon {}", label);
    println!("======={}", "=".repeat(label.len()));
    println!(
        "Descriptor: {} ({})",
        plist_path.display(),
        if plist_path.exists() { "present" } else { "absent" }
    );

    if let Some(definition) = config.daemon(label) {
        println!(
            "Program:    {} ({})",
            definition.program.display(),
            if definition.program.exists() { "present" } else { "absent" }
        );
    }

    if loaded {
        println!("\nDaemon is LOADED");
    } else {
        println!("\nDaemon is NOT LOADED");
    }

    Ok(())
}
