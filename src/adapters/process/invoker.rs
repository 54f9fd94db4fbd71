use std::ffi::OsString;
use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::core::errors::{Result, SigwardError};
use crate::core::services::sanitizer::sanitize;

/// Program plus arguments, with secret arguments masked when displayed.
#[derive(Clone)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
    secret: Vec<bool>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret: Vec::new(),
        }
    }

    /// Append a plain argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self.secret.push(false);
        self
    }

    /// Append an argument that must never be displayed or logged.
    pub fn secret_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self.secret.push(true);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for (arg, secret) in self.args.iter().zip(&self.secret) {
            if *secret {
                write!(f, " ***")?;
            } else {
                write!(f, " {}", arg.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandLine({self})")
    }
}

/// How the engine process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with a status code.
    Exited(i32),
    /// Killed by a signal or ended in a way that has no exit code.
    Abnormal(String),
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Abnormal(format!("terminated by signal {signal}"));
            }
        }
        Termination::Abnormal(format!("terminated abnormally ({status})"))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit status {code}"),
            Termination::Abnormal(detail) => f.write_str(detail),
        }
    }
}

/// Everything captured from one engine run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub termination: Termination,
}

impl ProcessOutput {
    /// Diagnostic stream decoded lossily. Not sanitized.
    pub fn diagnostics(&self) -> String {
        decode(&self.stderr)
    }

    /// Gate on the exit status: only codes in `expected` let the caller go
    /// on to parse diagnostics. Anything else is an `ExecutionFailed`.
    pub fn accept(&self, expected: &[i32]) -> Result<i32> {
        match &self.termination {
            Termination::Exited(code) if expected.contains(code) => Ok(*code),
            other => Err(SigwardError::ExecutionFailed {
                termination: other.to_string(),
                diagnostics: sanitize(&self.diagnostics()),
            }),
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

enum Outcome {
    Finished(io::Result<ExitStatus>),
    Aborted(String),
}

/// Runs the engine as a subprocess and captures its output.
///
/// One invocation owns one child process and its buffers; nothing is shared
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `command` to completion.
    ///
    /// `input`, when present, is streamed to the child's stdin while stdout
    /// and stderr are drained concurrently. If `cancel` resolves first, or
    /// the configured timeout elapses, the child is killed and reaped and
    /// the call fails with `Cancelled`.
    ///
    /// The engine always runs in the C locale so its diagnostics are the
    /// untranslated lines the parser understands.
    pub async fn run(
        &self,
        command: &CommandLine,
        input: Option<&[u8]>,
        cancel: impl Future<Output = ()>,
    ) -> Result<ProcessOutput> {
        tracing::debug!(command = %command, "starting engine");

        let mut child = Command::new(command.program())
            .args(command.args())
            .env("LC_ALL", "C")
            .env("LANGUAGE", "C")
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SigwardError::LaunchFailed {
                program: command.program().to_path_buf(),
                reason: e.to_string(),
            })?;

        let stdin = child.stdin.take();
        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take())
        else {
            terminate(&mut child).await;
            return Err(SigwardError::ResourceFailed {
                detail: "engine output pipes were not captured".into(),
            });
        };

        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = {
            let collect = async {
                let feed = async {
                    if let (Some(mut pipe), Some(data)) = (stdin, input) {
                        match pipe.write_all(data).await {
                            Ok(()) => {}
                            // The engine may exit before reading everything;
                            // its exit status decides what that means.
                            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                                tracing::debug!("engine closed stdin early");
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Ok::<(), io::Error>(())
                };

                let (fed, read_out, read_err) = tokio::join!(
                    feed,
                    stdout.read_to_end(&mut out),
                    stderr.read_to_end(&mut err),
                );
                fed?;
                read_out?;
                read_err?;

                child.wait().await
            };

            tokio::select! {
                result = collect => Outcome::Finished(result),
                () = cancel => Outcome::Aborted("cancelled by caller".into()),
                () = expire(self.timeout) => Outcome::Aborted(format!(
                    "deadline of {:?} exceeded",
                    self.timeout.unwrap_or_default()
                )),
            }
        };

        match outcome {
            Outcome::Finished(Ok(status)) => {
                let termination = Termination::from(status);
                tracing::debug!(
                    %termination,
                    stdout_bytes = out.len(),
                    stderr_bytes = err.len(),
                    "engine finished"
                );
                Ok(ProcessOutput {
                    stdout: out,
                    stderr: err,
                    termination,
                })
            }
            Outcome::Finished(Err(e)) => {
                terminate(&mut child).await;
                Err(lost_track(&e, &err))
            }
            Outcome::Aborted(reason) => {
                tracing::debug!(%reason, "killing engine");
                terminate(&mut child).await;
                Err(SigwardError::Cancelled { reason })
            }
        }
    }
}

/// Failure while talking to the engine. Keeps whatever diagnostics had
/// arrived before the pipe broke.
fn lost_track(error: &io::Error, partial_stderr: &[u8]) -> SigwardError {
    SigwardError::ExecutionFailed {
        termination: format!("lost track of engine process: {error}"),
        diagnostics: sanitize(&decode(partial_stderr)),
    }
}

async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// Kill and reap the child. Best effort.
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "failed to kill engine process");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;

    fn sh(script: &str) -> CommandLine {
        CommandLine::new("sh").arg("-c").arg(script)
    }

    async fn run(script: &str, input: Option<&[u8]>) -> Result<ProcessOutput> {
        ProcessInvoker::default()
            .run(&sh(script), input, std::future::pending())
            .await
    }

    #[test]
    fn display_masks_secret_arguments() {
        let cmd = CommandLine::new("gpg")
            .arg("--passphrase")
            .secret_arg("hunter2")
            .arg("--decrypt");
        let shown = cmd.to_string();
        assert_eq!(shown, "gpg --passphrase *** --decrypt");
        assert!(!format!("{cmd:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn captures_both_streams_and_exit_code() {
        let output = run("printf out; printf err >&2; exit 3", None).await.unwrap();
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
        assert_eq!(output.termination, Termination::Exited(3));
    }

    #[tokio::test]
    async fn engine_runs_in_c_locale() {
        let output = ProcessInvoker::default()
            .run(
                &sh(r#"printf '%s/%s' "$LC_ALL" "$LANGUAGE""#),
                None,
                std::future::pending(),
            )
            .await
            .unwrap();
        assert_eq!(output.stdout, b"C/C");
    }

    #[test]
    fn lost_engine_keeps_partial_diagnostics() {
        let error = io::Error::other("pipe vanished");
        match lost_track(&error, b"gpg: keybox opened\x1b[2J\r\n") {
            SigwardError::ExecutionFailed {
                termination,
                diagnostics,
            } => {
                assert!(termination.contains("pipe vanished"));
                assert!(diagnostics.contains("gpg: keybox opened"));
                assert!(!diagnostics.contains('\u{1b}'));
                assert!(!diagnostics.contains('\r'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn feeds_stdin() {
        let output = run("cat", Some(b"ciphertext")).await.unwrap();
        assert_eq!(output.stdout, b"ciphertext");
        assert_eq!(output.termination, Termination::Exited(0));
    }

    #[tokio::test]
    async fn large_input_and_output_do_not_deadlock() {
        let input = vec![b'x'; 1 << 20];
        let output = run("cat; cat /dev/null >&2", Some(&input)).await.unwrap();
        assert_eq!(output.stdout.len(), input.len());
    }

    #[tokio::test]
    async fn engine_ignoring_stdin_is_not_an_error() {
        let input = vec![b'x'; 1 << 20];
        let output = run("exit 0", Some(&input)).await.unwrap();
        assert_eq!(output.termination, Termination::Exited(0));
    }

    #[tokio::test]
    async fn missing_binary_is_launch_failure() {
        let err = ProcessInvoker::default()
            .run(
                &CommandLine::new("/nonexistent/sigward-engine"),
                None,
                std::future::pending(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SigwardError::LaunchFailed { .. }));
    }

    #[tokio::test]
    async fn signal_death_is_abnormal() {
        let output = run("kill -9 $$", None).await.unwrap();
        assert_eq!(
            output.termination,
            Termination::Abnormal("terminated by signal 9".into())
        );
        assert!(output.accept(&[0, 1]).is_err());
    }

    #[tokio::test]
    async fn cancellation_kills_the_child() {
        let start = Instant::now();
        let err = ProcessInvoker::default()
            .run(
                &sh("exec sleep 30"),
                None,
                tokio::time::sleep(Duration::from_millis(100)),
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn timeout_is_reported_as_deadline() {
        let err = ProcessInvoker::new(Some(Duration::from_millis(100)))
            .run(&sh("exec sleep 30"), None, std::future::pending())
            .await
            .unwrap_err();
        match err {
            SigwardError::Cancelled { reason } => assert!(reason.contains("deadline")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accept_gates_on_expected_codes() {
        let output = ProcessOutput {
            stdout: Vec::new(),
            stderr: b"gpg: no valid OpenPGP data found.\x1b[0m\r\n".to_vec(),
            termination: Termination::Exited(2),
        };
        assert!(output.accept(&[0, 1]).is_err());

        match output.accept(&[0]).unwrap_err() {
            SigwardError::ExecutionFailed {
                termination,
                diagnostics,
            } => {
                assert_eq!(termination, "exit status 2");
                assert!(diagnostics.contains("no valid OpenPGP data"));
                assert!(!diagnostics.contains('\u{1b}'));
                assert!(!diagnostics.contains('\r'));
            }
            other => panic!("unexpected error: {other}"),
        }

        let ok = ProcessOutput {
            termination: Termination::Exited(1),
            ..output
        };
        assert_eq!(ok.accept(&[0, 1]).unwrap(), 1);
    }
}
