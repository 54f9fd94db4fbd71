use std::io::Write;

use colored::Colorize;
use sigward::Status;
use sigward::core::errors::Result;

/// Where human-readable lines go. Decrypt keeps stdout for plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

fn emit(stream: Stream, line: String) {
    match stream {
        Stream::Stdout => println!("{line}"),
        Stream::Stderr => eprintln!("{line}"),
    }
}

/// Print a success message.
pub fn success(stream: Stream, msg: &str) {
    emit(stream, format!("  {} {}", "✓".green(), msg));
}

/// Print a warning message.
pub fn warning(stream: Stream, msg: &str) {
    emit(stream, format!("  {} {}", "⚠".yellow(), msg));
}

/// Print a failure line on the given stream.
pub fn failure(stream: Stream, msg: &str) {
    emit(stream, format!("  {} {}", "✗".red(), msg));
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print an indented detail line.
pub fn detail(stream: Stream, msg: &str) {
    emit(stream, format!("    {}", msg.dimmed()));
}

/// Render a status. Every string in `Status` is already sanitized.
pub fn report(status: &Status, stream: Stream, json: bool, quiet: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(status).map_err(std::io::Error::from)?;
        emit(stream, line);
        return Ok(());
    }

    match (status.signer(), status.signature_valid()) {
        (Some(signer), true) => {
            if !quiet {
                success(stream, &format!("Good signature from {signer}"));
            }
        }
        // Shown even in quiet mode.
        (Some(signer), false) => failure(stream, &format!("BAD signature from {signer}")),
        (None, _) => {
            if !quiet {
                warning(stream, "No signature");
            }
        }
    }

    if !quiet {
        for recipient in status.encrypted_for() {
            detail(stream, &format!("Encrypted for {recipient}"));
        }
    }

    Ok(())
}

/// Write raw bytes to stdout.
pub fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
