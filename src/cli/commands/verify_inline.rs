use std::path::Path;

use sigward::core::errors::Result;
use sigward::{GpgEngine, SignatureEngine};

use crate::cli::output::{self, Stream};
use crate::cli::{Cli, Outcome, context};

/// Execute the `sigward verify-inline` command.
pub fn execute(cli: &Cli, file: Option<&Path>) -> Result<Outcome> {
    let message = context::read_input(file)?;
    let engine = GpgEngine::new(context::engine_options(cli)?);

    let status = context::block_on(engine.verify_inline(&message, context::interrupted()))??;

    output::report(&status, Stream::Stdout, cli.json, cli.quiet)?;
    Ok(if status.signature_valid() {
        Outcome::Clean
    } else {
        Outcome::BadSignature
    })
}
