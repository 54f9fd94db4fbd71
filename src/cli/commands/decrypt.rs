use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use sigward::core::errors::{Result, SigwardError};
use sigward::{GpgEngine, SignatureEngine};

use crate::cli::output::{self, Stream};
use crate::cli::{Cli, Outcome, context};

/// Execute the `sigward decrypt` command.
///
/// Reads the message from `file` or stdin and writes the plaintext to
/// `dest` or stdout. The status summary goes to stderr so it never mixes
/// with plaintext.
pub fn execute(cli: &Cli, file: Option<&Path>, dest: Option<&Path>) -> Result<Outcome> {
    let engine = GpgEngine::new(context::engine_options(cli)?);
    let ciphertext = context::read_input(file)?;
    decrypt_with(&engine, &ciphertext, dest, cli)
}

/// Decrypt with a given engine.
fn decrypt_with<E: SignatureEngine>(
    engine: &E,
    ciphertext: &[u8],
    dest: Option<&Path>,
    cli: &Cli,
) -> Result<Outcome> {
    let decrypted = context::block_on(engine.decrypt(ciphertext, context::interrupted()))??;

    match dest {
        Some(path) => {
            write_private(path, &decrypted.plaintext)?;
            if !cli.quiet && !cli.json {
                output::success(
                    Stream::Stderr,
                    &format!("Decrypted with {} to {}", engine.name(), path.display()),
                );
            }
        }
        None => output::write_stdout(&decrypted.plaintext)?,
    }

    output::report(&decrypted.status, Stream::Stderr, cli.json, cli.quiet)?;

    if decrypted.status.signer().is_some() && !decrypted.status.signature_valid() {
        return Ok(Outcome::BadSignature);
    }
    Ok(Outcome::Clean)
}

/// Plaintext files are owner-only, including files that already existed.
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(|e| SigwardError::ResourceFailed {
        detail: format!("cannot create {}: {e}", path.display()),
    })?;
    // `mode` only applies on creation; tighten before any plaintext lands.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(|e| SigwardError::ResourceFailed {
                detail: format!("cannot restrict {}: {e}", path.display()),
            })?;
    }
    file.write_all(bytes)?;
    Ok(())
}
