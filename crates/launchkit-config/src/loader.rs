//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config location: `~/.launchkit/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".launchkit").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".launchkit/config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_config_paths(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        if let Some(missing) = ENV_VAR
            .captures_iter(content)
            .map(|cap| cap[1].to_string())
            .find(|name| std::env::var(name).is_err())
        {
            return Err(ConfigError::EnvVarNotSet(missing));
        }

        let expanded = ENV_VAR.replace_all(content, |cap: &Captures| {
            std::env::var(&cap[1]).unwrap_or_default()
        });
        Ok(expanded.into_owned())
    }

    fn expand_config_paths(config: &mut Config) {
        config.launchd.plist_dir = Self::expand_pathbuf(&config.launchd.plist_dir);
        for daemon in config.daemons.values_mut() {
            daemon.program = Self::expand_pathbuf(&daemon.program);
            daemon.source = daemon.source.as_deref().map(Self::expand_pathbuf);
        }
    }

    fn expand_pathbuf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    /// Expand shell-style paths (e.g., `~/Library/LaunchAgents`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.launchd.plist_dir, PathBuf::from("/Library/LaunchDaemons"));
        assert!(config.daemons.is_empty());
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/Library/LaunchAgents");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("Library/LaunchAgents"));
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [launchd]
            plist_dir = "/tmp/plists"
            launchctl = "/bin/launchctl"

            [daemons."org.x.d"]
            program = "/tmp/bin/org.x.d"
            program_arguments = ["/tmp/bin/org.x.d", "arg1"]
            run_at_load = false
            source = "/tmp/build/d"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.launchd.plist_dir, PathBuf::from("/tmp/plists"));
        assert_eq!(config.launchd.launchctl, PathBuf::from("/bin/launchctl"));

        let daemon = config.daemon("org.x.d").unwrap();
        assert_eq!(daemon.program, PathBuf::from("/tmp/bin/org.x.d"));
        assert_eq!(daemon.program_arguments, vec!["/tmp/bin/org.x.d", "arg1"]);
        assert!(!daemon.run_at_load);
        assert_eq!(daemon.source, Some(PathBuf::from("/tmp/build/d")));
    }

    #[test]
    fn test_tilde_expanded_in_paths() {
        let content = r#"
            [launchd]
            plist_dir = "~/Library/LaunchAgents"

            [daemons."org.x.d"]
            program = "~/bin/org.x.d"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.launchd.plist_dir.to_string_lossy().starts_with('~'));
        assert!(!config.daemons["org.x.d"].program.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[launchd]").unwrap();
        writeln!(file, "plist_dir = \"/tmp/from-file\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.launchd.plist_dir, PathBuf::from("/tmp/from-file"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.launchd.launchctl, PathBuf::from("launchctl"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("plist_dir = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let result = ConfigLoader::load_str("[launchd]\nplist_dir = \"\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: unique test-only variable name
        unsafe {
            std::env::set_var("LAUNCHKIT_TEST_PLIST_DIR", "/tmp/env-plists");
        }
        let content = "[launchd]\nplist_dir = \"${LAUNCHKIT_TEST_PLIST_DIR}\"\n";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.launchd.plist_dir, PathBuf::from("/tmp/env-plists"));
        unsafe {
            std::env::remove_var("LAUNCHKIT_TEST_PLIST_DIR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${LAUNCHKIT_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "LAUNCHKIT_NONEXISTENT_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }
}
