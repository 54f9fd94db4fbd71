use std::path::PathBuf;

/// All domain errors for Sigward.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger. Any text captured from the engine's
/// diagnostic stream has already been sanitized by the time it lands here.
#[derive(Debug, thiserror::Error)]
pub enum SigwardError {
    #[error(
        "Failed to start the engine ({program}): {reason}\n\n  \
         Solutions:\n    \
         → Check that gpg is installed: gpg --version\n    \
         → Point sigward at the binary: --gpg /path/to/gpg"
    )]
    LaunchFailed { program: PathBuf, reason: String },

    #[error(
        "Engine failed ({termination})\n\n  \
         Engine diagnostics:\n{diagnostics}"
    )]
    ExecutionFailed {
        termination: String,
        diagnostics: String,
    },

    #[error("Operation cancelled: {reason}")]
    Cancelled { reason: String },

    #[error(
        "Signature result indeterminate: the engine reported neither a good nor a bad signature\n\n  \
         The message was NOT treated as verified.\n\n  \
         Engine diagnostics:\n{diagnostics}"
    )]
    IndeterminateResult { diagnostics: String },

    #[error("Temporary file error: {detail}")]
    ResourceFailed { detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists."
    )]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigwardError {
    /// True when the caller (or a deadline) aborted the operation,
    /// as opposed to the engine failing on its own.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SigwardError::Cancelled { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SigwardError>;
