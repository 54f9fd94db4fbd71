use std::future::Future;

use secrecy::ExposeSecret;

use crate::adapters::process::invoker::{CommandLine, ProcessInvoker, Termination};
use crate::adapters::workspace::signature_workspace::SignatureWorkspace;
use crate::config::engine_options::EngineOptions;
use crate::core::errors::Result;
use crate::core::models::status::Status;
use crate::core::services::diagnostic_parser::DiagnosticParser;
use crate::core::services::status_resolver::{StatusResolver, VerdictPolicy};
use crate::core::traits::engine::{Decrypted, SignatureEngine};

/// Exit codes after which decrypt output is trusted.
const DECRYPT_EXIT_CODES: &[i32] = &[0];

/// gpg exits 1 for a completed check with a BAD signature or a missing key;
/// the verdict comes from the diagnostic stream either way.
const VERIFY_EXIT_CODES: &[i32] = &[0, 1];

/// How signed content reaches the engine.
enum SignedInput<'a> {
    /// Content and detached signature, written to a temp workspace.
    Detached { content: &'a [u8], signature: &'a [u8] },
    /// Self-contained signed content on stdin.
    Inline(&'a [u8]),
}

/// Engine handle that shells out to the system `gpg` binary.
///
/// Holds configuration only. Each call spawns its own process and owns its
/// own buffers and temp files, so one handle can serve concurrent calls.
#[derive(Debug)]
pub struct GpgEngine {
    options: EngineOptions,
    invoker: ProcessInvoker,
}

impl GpgEngine {
    pub fn new(options: EngineOptions) -> Self {
        let invoker = ProcessInvoker::new(options.timeout);
        Self { options, invoker }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Check if the engine binary can be run.
    pub async fn is_available(&self) -> bool {
        let command = CommandLine::new(&self.options.program).arg("--version");
        self.invoker
            .run(&command, None, std::future::pending())
            .await
            .is_ok_and(|o| o.termination == Termination::Exited(0))
    }

    /// Flags shared by every call: no prompts, no terminal.
    fn base_command(&self) -> CommandLine {
        let mut command = CommandLine::new(&self.options.program)
            .arg("--batch")
            .arg("--no-tty");
        if let Some(homedir) = &self.options.homedir {
            command = command.arg("--homedir").arg(homedir);
        }
        command
    }

    fn decrypt_command(&self) -> CommandLine {
        let mut command = self.base_command();
        if let Some(passphrase) = &self.options.passphrase {
            command = command
                .arg("--passphrase")
                .secret_arg(passphrase.expose_secret())
                .arg("--pinentry-mode")
                .arg("loopback");
        }
        command.arg("--decrypt")
    }

    /// Shared verify path for detached and inline signatures.
    async fn check_signature(
        &self,
        input: SignedInput<'_>,
        cancel: impl Future<Output = ()>,
    ) -> Result<Status> {
        let (workspace, command, stdin) = match input {
            SignedInput::Detached { content, signature } => {
                let workspace = SignatureWorkspace::create(
                    self.options.temp_root.as_deref(),
                    self.options.keep_temp_files,
                    content,
                    signature,
                )?;
                tracing::info!(path = %workspace.path().display(), "checking detached signature");
                let command = self
                    .base_command()
                    .arg("--verify")
                    .arg(workspace.signature_path())
                    .arg(workspace.data_path());
                (Some(workspace), command, None)
            }
            SignedInput::Inline(content) => {
                tracing::info!(content_bytes = content.len(), "checking inline signature");
                let command = self.base_command().arg("--verify").arg("-");
                (None, command, Some(content))
            }
        };

        let run = self.invoker.run(&command, stdin, cancel).await;

        if let Some(workspace) = workspace {
            match workspace.close() {
                Err(e) if run.is_ok() => return Err(e),
                Err(e) => tracing::warn!(error = %e, "signature temp cleanup failed"),
                Ok(()) => {}
            }
        }

        let output = run?;
        output.accept(VERIFY_EXIT_CODES)?;

        let report = DiagnosticParser.parse_bytes(&output.stderr);
        let status =
            StatusResolver.resolve(report, VerdictPolicy::Required, &output.diagnostics())?;

        tracing::info!(
            signer = status.signer().unwrap_or_default(),
            valid = status.signature_valid(),
            "signature checked"
        );
        Ok(status)
    }
}

impl Default for GpgEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl SignatureEngine for GpgEngine {
    async fn decrypt(
        &self,
        content: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Decrypted> {
        let command = self.decrypt_command();
        let output = self.invoker.run(&command, Some(content), cancel).await?;
        output.accept(DECRYPT_EXIT_CODES)?;

        let report = DiagnosticParser.parse_bytes(&output.stderr);
        let status =
            StatusResolver.resolve(report, VerdictPolicy::Optional, &output.diagnostics())?;

        tracing::info!(
            plaintext_bytes = output.stdout.len(),
            recipients = status.encrypted_for().len(),
            signed = status.signer().is_some(),
            "decrypted"
        );
        Ok(Decrypted {
            plaintext: output.stdout,
            status,
        })
    }

    async fn verify(
        &self,
        content: &[u8],
        signature: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Status> {
        self.check_signature(SignedInput::Detached { content, signature }, cancel)
            .await
    }

    async fn verify_inline(
        &self,
        content: &[u8],
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<Status> {
        self.check_signature(SignedInput::Inline(content), cancel)
            .await
    }

    fn name(&self) -> &str {
        "gpg"
    }
}
