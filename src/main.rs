mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Outcome};

fn main() {
    let args = Cli::parse();

    // Logs go to stderr; stdout may carry plaintext.
    let default_filter = if args.verbose { "sigward=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &args.command {
        Commands::Decrypt { file, output } => {
            cli::commands::decrypt::execute(&args, file.as_deref(), output.as_deref())
        }
        Commands::Verify { data, signature } => {
            cli::commands::verify::execute(&args, data, signature)
        }
        Commands::VerifyInline { file } => {
            cli::commands::verify_inline::execute(&args, file.as_deref())
        }
    };

    match result {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::BadSignature) => std::process::exit(2),
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
