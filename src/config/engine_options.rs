use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Default engine binary, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "gpg";

/// Configuration for one engine handle.
///
/// Built once and then owned by the engine; nothing in it changes while
/// calls are in flight.
#[derive(Debug)]
pub struct EngineOptions {
    /// Path to the engine binary.
    pub program: PathBuf,
    /// Non-interactive passphrase for automated/test use. Never logged.
    pub passphrase: Option<SecretString>,
    /// Alternate keyring home, passed as `--homedir`.
    pub homedir: Option<PathBuf>,
    /// Leave verify temp files on disk for debugging.
    pub keep_temp_files: bool,
    /// Parent directory for verify temp files (system temp dir if unset).
    pub temp_root: Option<PathBuf>,
    /// Per-call deadline.
    pub timeout: Option<Duration>,
}

impl EngineOptions {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            passphrase: None,
            homedir: None,
            keep_temp_files: false,
            temp_root: None,
            timeout: None,
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    pub fn keep_temp_files(mut self, keep: bool) -> Self {
        self.keep_temp_files = keep;
        self
    }

    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_gpg_without_extras() {
        let options = EngineOptions::default();
        assert_eq!(options.program, PathBuf::from("gpg"));
        assert!(options.passphrase.is_none());
        assert!(!options.keep_temp_files);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn debug_output_redacts_passphrase() {
        let options = EngineOptions::new("/usr/bin/gpg").with_passphrase("hunter2");
        let shown = format!("{options:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("/usr/bin/gpg"));
    }
}
