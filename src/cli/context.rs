use std::future::Future;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use sigward::EngineOptions;
use sigward::config::app_config::AppConfig;
use sigward::core::errors::{Result, SigwardError};

use crate::cli::Cli;

/// Build engine options: config file first, then command-line overrides.
pub fn engine_options(cli: &Cli) -> Result<EngineOptions> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    let mut options = config.engine_options();

    if let Some(program) = &cli.gpg {
        options.program = program.clone();
    }
    if let Some(homedir) = &cli.homedir {
        options = options.with_homedir(homedir.clone());
    }
    if let Some(secs) = cli.timeout {
        if secs == 0 {
            return Err(SigwardError::InvalidConfig {
                detail: "--timeout must be greater than zero".into(),
            });
        }
        options = options.with_timeout(Duration::from_secs(secs));
    }
    if cli.keep_temp_files {
        options = options.keep_temp_files(true);
    }
    if let Some(passphrase) = &cli.passphrase {
        options = options.with_passphrase(passphrase.clone());
    }

    Ok(options)
}

/// Drive one engine call to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SigwardError::ResourceFailed {
            detail: format!("Failed to create async runtime: {e}"),
        })?;
    Ok(rt.block_on(future))
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Read a whole file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(SigwardError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read(path)?)
}
