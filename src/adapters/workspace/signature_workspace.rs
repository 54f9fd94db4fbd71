use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::errors::{Result, SigwardError};

const DIR_PREFIX: &str = "gpg-signature";
const DATA_FILE: &str = "data";
const SIGNATURE_FILE: &str = "data.gpg";

enum Location {
    /// Removed on `close()`, or on drop if `close()` is never reached.
    Managed(TempDir),
    /// Left on disk for debugging.
    Retained(PathBuf),
}

/// Owner-only temporary directory holding the signed content and its
/// detached signature for one verify call.
pub struct SignatureWorkspace {
    location: Location,
    data_path: PathBuf,
    signature_path: PathBuf,
}

impl SignatureWorkspace {
    /// Create the directory under `root` (or the system temp dir) and write
    /// both files with mode 0600.
    ///
    /// With `retain` set the directory survives every exit path, including
    /// a failed write.
    pub fn create(
        root: Option<&Path>,
        retain: bool,
        content: &[u8],
        signature: &[u8],
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| SigwardError::ResourceFailed {
            detail: format!("cannot create temporary directory: {e}"),
        })?;

        let location = if retain {
            let path = dir.keep();
            tracing::info!(path = %path.display(), "keeping signature temp files");
            Location::Retained(path)
        } else {
            Location::Managed(dir)
        };

        let base = match &location {
            Location::Managed(dir) => dir.path().to_path_buf(),
            Location::Retained(path) => path.clone(),
        };
        let workspace = Self {
            location,
            data_path: base.join(DATA_FILE),
            signature_path: base.join(SIGNATURE_FILE),
        };

        write_private(&workspace.data_path, content)?;
        write_private(&workspace.signature_path, signature)?;
        tracing::debug!(
            path = %workspace.path().display(),
            content_bytes = content.len(),
            signature_bytes = signature.len(),
            "signature workspace ready"
        );

        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        match &self.location {
            Location::Managed(dir) => dir.path(),
            Location::Retained(path) => path,
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn signature_path(&self) -> &Path {
        &self.signature_path
    }

    pub fn is_retained(&self) -> bool {
        matches!(self.location, Location::Retained(_))
    }

    /// Remove the directory, reporting failures. Retained workspaces are
    /// left alone.
    pub fn close(self) -> Result<()> {
        match self.location {
            Location::Managed(dir) => {
                let path = dir.path().to_path_buf();
                dir.close().map_err(|e| SigwardError::ResourceFailed {
                    detail: format!("cannot remove {}: {e}", path.display()),
                })
            }
            Location::Retained(path) => {
                tracing::info!(path = %path.display(), "signature temp files left in place");
                Ok(())
            }
        }
    }
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| SigwardError::ResourceFailed {
            detail: format!("cannot create {}: {e}", path.display()),
        })?;
    file.write_all(bytes)
        .map_err(|e| SigwardError::ResourceFailed {
            detail: format!("cannot write {}: {e}", path.display()),
        })
}
