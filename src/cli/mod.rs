pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Decrypt and verify with gpg, and report only what is safe to show.
///
/// Exit codes: 0 success, 1 error, 2 bad signature.
#[derive(Parser, Debug)]
#[command(name = "sigward", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Engine binary (default: gpg from PATH, or the config file)
    #[arg(long, global = true, env = "SIGWARD_GPG")]
    pub gpg: Option<PathBuf>,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keyring home directory passed to the engine
    #[arg(long, global = true)]
    pub homedir: Option<PathBuf>,

    /// Kill the engine if it runs longer than this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Keep the temporary files used for detached verification
    #[arg(long, global = true)]
    pub keep_temp_files: bool,

    /// Passphrase for unattended decryption (automation and tests only)
    #[arg(long, global = true, env = "SIGWARD_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decrypt a message (plaintext to stdout, status to stderr)
    Decrypt {
        /// Encrypted message (default: stdin)
        file: Option<PathBuf>,
        /// Write plaintext here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a detached signature
    Verify {
        /// Signed content
        data: PathBuf,
        /// Detached signature
        signature: PathBuf,
    },

    /// Verify a message that carries its own signature
    VerifyInline {
        /// Signed message (default: stdin)
        file: Option<PathBuf>,
    },
}

/// How a successful command ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    BadSignature,
}
