//! Glue between CLI arguments, the config file and the daemon installer.

use std::path::{Path, PathBuf};

use launchkit_config::{Config, ConfigLoader};
use launchkit_daemon::DaemonSpec;

use crate::cli::SpecArgs;

/// Get the .launchkit directory path.
pub(crate) fn launchkit_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".launchkit"))
        .unwrap_or_else(|| PathBuf::from(".launchkit"))
}

/// Load the config file and apply command-line overrides.
pub(crate) fn load_config(
    path: Option<&Path>,
    plist_dir: Option<PathBuf>,
    launchctl: Option<PathBuf>,
) -> Result<Config, Box<dyn std::error::Error>> {
    // An explicitly named file must exist; the default one is optional.
    let mut config = match path {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&ConfigLoader::default_path())?,
    };

    if let Some(dir) = plist_dir {
        config.launchd.plist_dir = dir;
    }
    if let Some(launchctl) = launchctl {
        config.launchd.launchctl = launchctl;
    }
    config.validate()?;
    Ok(config)
}

/// Build a daemon spec from the config entry for `label`, overridden by flags.
///
/// `--arg` values follow the program path in the argument vector and replace
/// any arguments from the config file.
pub(crate) fn resolve_spec(
    config: &Config,
    label: &str,
    args: &SpecArgs,
) -> Result<DaemonSpec, Box<dyn std::error::Error>> {
    let definition = config.daemon(label);

    let mut spec = match (definition, &args.program) {
        (Some(definition), None) => DaemonSpec::from_definition(label, definition),
        (Some(definition), Some(program)) => {
            DaemonSpec::new(label, program.clone()).run_at_load(definition.run_at_load)
        }
        (None, Some(program)) => DaemonSpec::new(label, program.clone()),
        (None, None) => {
            return Err(format!(
                "no program for {label}: pass --program or add [daemons.\"{label}\"] to the config"
            )
            .into());
        }
    };

    if !args.args.is_empty() {
        let mut vector = vec![spec.program.to_string_lossy().into_owned()];
        vector.extend(args.args.iter().cloned());
        spec = spec.program_arguments(vector);
    }

    if args.no_run_at_load {
        spec = spec.run_at_load(false);
    }

    Ok(spec)
}

/// The executable to install for `label`: the flag, else the config entry.
pub(crate) fn resolve_source(
    config: &Config,
    label: &str,
    source: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    source
        .or_else(|| config.daemon(label).and_then(|d| d.source.clone()))
        .ok_or_else(|| format!("no source executable for {label}: pass --source").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> Config {
        ConfigLoader::load_str(
            r#"
            [daemons."org.example.agent"]
            program = "/usr/local/libexec/agent"
            program_arguments = ["/usr/local/libexec/agent", "--serve"]
            run_at_load = false
            source = "/build/agent"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_from_config() {
        let spec = resolve_spec(&config(), "org.example.agent", &SpecArgs::default()).unwrap();
        assert_eq!(spec.program, PathBuf::from("/usr/local/libexec/agent"));
        assert_eq!(spec.program_arguments, vec!["/usr/local/libexec/agent", "--serve"]);
        assert!(!spec.run_at_load);
    }

    #[test]
    fn test_resolve_program_override() {
        let args = SpecArgs {
            program: Some(PathBuf::from("/opt/agent")),
            ..Default::default()
        };
        let spec = resolve_spec(&config(), "org.example.agent", &args).unwrap();
        assert_eq!(spec.program, PathBuf::from("/opt/agent"));
        assert_eq!(spec.program_arguments, vec!["/opt/agent"]);
        assert!(!spec.run_at_load);
    }

    #[test]
    fn test_resolve_without_config_entry() {
        let args = SpecArgs {
            program: Some(PathBuf::from("/tmp/bin/org.x.d")),
            args: vec!["arg1".to_string()],
            no_run_at_load: false,
        };
        let spec = resolve_spec(&Config::default(), "org.x.d", &args).unwrap();
        assert_eq!(spec.program_arguments, vec!["/tmp/bin/org.x.d", "arg1"]);
        assert!(spec.run_at_load);
    }

    #[test]
    fn test_resolve_no_run_at_load_flag() {
        let args = SpecArgs {
            program: Some(PathBuf::from("/tmp/bin/org.x.d")),
            args: vec![],
            no_run_at_load: true,
        };
        let spec = resolve_spec(&Config::default(), "org.x.d", &args).unwrap();
        assert!(!spec.run_at_load);
    }

    #[test]
    fn test_resolve_unknown_label_without_program() {
        let err = resolve_spec(&Config::default(), "org.x.d", &SpecArgs::default()).unwrap_err();
        assert!(err.to_string().contains("--program"));
    }

    #[test]
    fn test_resolve_source() {
        let config = config();
        assert_eq!(
            resolve_source(&config, "org.example.agent", None).unwrap(),
            PathBuf::from("/build/agent")
        );
        assert_eq!(
            resolve_source(&config, "org.example.agent", Some(PathBuf::from("/other"))).unwrap(),
            PathBuf::from("/other")
        );
        assert!(resolve_source(&config, "org.x.d", None).is_err());
    }

    #[test]
    fn test_load_config_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[launchd]\nplist_dir = \"/tmp/from-file\"").unwrap();

        let config = load_config(
            Some(file.path()),
            Some(PathBuf::from("/tmp/from-flag")),
            Some(PathBuf::from("/tmp/fake-launchctl")),
        )
        .unwrap();
        assert_eq!(config.launchd.plist_dir, PathBuf::from("/tmp/from-flag"));
        assert_eq!(config.launchd.launchctl, PathBuf::from("/tmp/fake-launchctl"));
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        assert!(load_config(Some(Path::new("/nonexistent/launchkit.toml")), None, None).is_err());
    }
}
