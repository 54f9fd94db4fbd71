use std::path::Path;

use sigward::core::errors::Result;
use sigward::{GpgEngine, SignatureEngine};

use crate::cli::output::{self, Stream};
use crate::cli::{Cli, Outcome, context};

/// Execute the `sigward verify` command.
///
/// Checks a detached `signature` over the contents of `data`.
pub fn execute(cli: &Cli, data: &Path, signature: &Path) -> Result<Outcome> {
    let content = context::read_file(data)?;
    let sig = context::read_file(signature)?;
    let engine = GpgEngine::new(context::engine_options(cli)?);

    let status = context::block_on(engine.verify(&content, &sig, context::interrupted()))??;

    output::report(&status, Stream::Stdout, cli.json, cli.quiet)?;
    Ok(if status.signature_valid() {
        Outcome::Clean
    } else {
        Outcome::BadSignature
    })
}
