use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::engine_options::{DEFAULT_PROGRAM, EngineOptions};
use crate::core::errors::{Result, SigwardError};

/// Top-level Sigward configuration read from `config.toml`.
///
/// The passphrase is deliberately not a config key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSection,
}

impl AppConfig {
    /// Load the configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SigwardError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load `<config_dir>/sigward/config.toml` if it exists, otherwise
    /// fall back to defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Platform config location, e.g. `~/.config/sigward/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sigward").join("config.toml"))
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| SigwardError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.engine.program.as_os_str().is_empty() {
            return Err(SigwardError::InvalidConfig {
                detail: "engine.program must not be empty".into(),
            });
        }
        if config.engine.timeout_secs == Some(0) {
            return Err(SigwardError::InvalidConfig {
                detail: "engine.timeout_secs must be greater than zero".into(),
            });
        }

        Ok(config)
    }

    /// Engine options described by this file.
    pub fn engine_options(&self) -> EngineOptions {
        let section = &self.engine;
        let mut options =
            EngineOptions::new(section.program.clone()).keep_temp_files(section.keep_temp_files);
        if let Some(homedir) = &section.homedir {
            options = options.with_homedir(homedir.clone());
        }
        if let Some(root) = &section.temp_dir {
            options = options.with_temp_root(root.clone());
        }
        if let Some(secs) = section.timeout_secs {
            options = options.with_timeout(Duration::from_secs(secs));
        }
        options
    }
}

/// The `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    #[serde(default = "default_program")]
    pub program: PathBuf,
    pub homedir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub keep_temp_files: bool,
    pub temp_dir: Option<PathBuf>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            homedir: None,
            timeout_secs: None,
            keep_temp_files: false,
            temp_dir: None,
        }
    }
}

fn default_program() -> PathBuf {
    PathBuf::from(DEFAULT_PROGRAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.engine.program, PathBuf::from("gpg"));
        assert!(!config.engine.keep_temp_files);
        assert!(config.engine.timeout_secs.is_none());
    }

    #[test]
    fn full_engine_section() {
        let config = AppConfig::parse(
            r#"
            [engine]
            program = "/opt/gnupg/bin/gpg"
            homedir = "/srv/keys"
            timeout_secs = 20
            keep_temp_files = true
            temp_dir = "/var/tmp/sigward"
            "#,
        )
        .unwrap();

        let options = config.engine_options();
        assert_eq!(options.program, PathBuf::from("/opt/gnupg/bin/gpg"));
        assert_eq!(options.homedir, Some(PathBuf::from("/srv/keys")));
        assert_eq!(options.timeout, Some(Duration::from_secs(20)));
        assert!(options.keep_temp_files);
        assert_eq!(options.temp_root, Some(PathBuf::from("/var/tmp/sigward")));
        assert!(options.passphrase.is_none());
    }

    #[test]
    fn passphrase_key_is_rejected() {
        let err = AppConfig::parse("[engine]\npassphrase = \"hunter2\"\n").unwrap_err();
        assert!(matches!(err, SigwardError::InvalidConfig { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = AppConfig::parse("[engine]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = AppConfig::load(Path::new("/nonexistent/sigward.toml")).unwrap_err();
        assert!(matches!(err, SigwardError::FileNotFound { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\nprogram = \"gpg2\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.engine.program, PathBuf::from("gpg2"));
    }
}
