//! Tool process runner
//!
//! Runs one tool against one prompt and reports a structured outcome.
//! Failures of the tool itself (spawn error, non-zero exit, empty output,
//! timeout) are folded into a failed `ExecutionResult`, never an `Err`.

use crate::executor::template::build_invocation;
use crate::registry::ToolDefinition;
use async_trait::async_trait;
use colored::Colorize;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// How a single execution interacts with the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecMode {
    /// Print the resolved command and let the child use our stdin
    pub debug: bool,

    /// Capture only; do not stream output while the tool runs
    pub silent: bool,
}

impl ExecMode {
    /// Captured-only execution, as used by dispatch and check
    pub fn silent() -> Self {
        Self {
            debug: false,
            silent: true,
        }
    }

    /// Streaming execution for running a single tool by hand
    pub fn interactive(debug: bool) -> Self {
        Self {
            debug,
            silent: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Outcome of one tool execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,

    /// Trimmed standard output when successful
    pub output: String,

    /// Human-readable failure cause when unsuccessful
    pub error: Option<String>,

    /// Wall-clock time of the call
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            duration,
        }
    }

    pub fn failure(error: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            duration,
        }
    }

    /// Classify a finished process
    ///
    /// Success needs exit code zero and non-blank stdout. Stderr is the
    /// preferred failure detail when present.
    pub fn from_exit(
        exit_code: Option<i32>,
        stdout: &str,
        stderr: &str,
        duration: Duration,
    ) -> Self {
        let stderr = stderr.trim();
        match exit_code {
            Some(0) => {
                let output = stdout.trim();
                if !output.is_empty() {
                    Self::success(output, duration)
                } else if stderr.is_empty() {
                    Self::failure("Tool produced no output", duration)
                } else {
                    Self::failure(format!("Tool produced no output: {}", stderr), duration)
                }
            }
            Some(code) if stderr.is_empty() => {
                Self::failure(format!("Tool exited with code {}", code), duration)
            }
            None if stderr.is_empty() => {
                Self::failure("Tool was terminated by a signal", duration)
            }
            _ => Self::failure(stderr, duration),
        }
    }
}

/// Executes tools; the seam the dispatcher and benchmarker run through
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn execute(&self, tool: &ToolDefinition, prompt: &str, mode: ExecMode) -> ExecutionResult;
}

/// Runs tools as child processes with a hard timeout
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn execute(&self, tool: &ToolDefinition, prompt: &str, mode: ExecMode) -> ExecutionResult {
        let start = Instant::now();

        let invocation = match build_invocation(&tool.command, prompt) {
            Ok(invocation) => invocation,
            Err(e) => return ExecutionResult::failure(e.to_string(), start.elapsed()),
        };

        if mode.debug {
            eprintln!("{} {}", "Command:".dimmed(), invocation.display());
        }
        debug!(tool = %tool.name, command = %invocation.display(), "spawning tool");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(if mode.debug { Stdio::inherit() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult::failure(
                    spawn_error_message(&invocation.program, &e),
                    start.elapsed(),
                )
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let echo = !mode.silent;

        let outcome = timeout(self.timeout, async {
            let (out, err) = tokio::join!(
                drain(stdout, echo.then_some(Echo::Stdout)),
                drain(stderr, echo.then_some(Echo::Stderr)),
            );
            let status = child.wait().await;
            (out, err, status)
        })
        .await;

        match outcome {
            Ok((out, err, Ok(status))) => {
                ExecutionResult::from_exit(status.code(), &out, &err, start.elapsed())
            }
            Ok((_, _, Err(e))) => ExecutionResult::failure(
                format!("Failed to wait for {}: {}", invocation.program, e),
                start.elapsed(),
            ),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(tool = %tool.name, error = %e, "failed to kill timed out tool");
                }
                ExecutionResult::failure(
                    format!("Tool timed out after {:.1}s", self.timeout.as_secs_f64()),
                    start.elapsed(),
                )
            }
        }
    }
}

fn spawn_error_message(program: &str, err: &std::io::Error) -> String {
    match err.kind() {
        std::io::ErrorKind::NotFound => format!("Command not found: {}", program),
        std::io::ErrorKind::PermissionDenied => format!("Command is not executable: {}", program),
        _ => format!("Failed to start {}: {}", program, err),
    }
}

/// Read a pipe to the end, optionally echoing it live
async fn drain<R: AsyncRead + Unpin>(reader: Option<R>, echo: Option<Echo>) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };

    let mut captured = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        captured.extend_from_slice(&buf[..n]);

        match echo {
            Some(Echo::Stdout) => {
                let mut out = tokio::io::stdout();
                let _ = out.write_all(&buf[..n]).await;
                let _ = out.flush().await;
            }
            Some(Echo::Stderr) => {
                let mut err = tokio::io::stderr();
                let _ = err.write_all(&buf[..n]).await;
                let _ = err.flush().await;
            }
            None => {}
        }
    }

    String::from_utf8_lossy(&captured).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(command: &str) -> ToolDefinition {
        ToolDefinition::new("test", command, "")
    }

    #[test]
    fn test_zero_exit_blank_output_is_failure() {
        let result = ExecutionResult::from_exit(Some(0), "  \n\t ", "", Duration::ZERO);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Tool produced no output"));
    }

    #[test]
    fn test_nonzero_exit_prefers_stderr() {
        let result = ExecutionResult::from_exit(Some(2), "", "auth expired\n", Duration::ZERO);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("auth expired"));
    }

    #[test]
    fn test_nonzero_exit_without_stderr() {
        let result = ExecutionResult::from_exit(Some(3), "partial", "", Duration::ZERO);
        assert_eq!(result.error.as_deref(), Some("Tool exited with code 3"));
    }

    #[test]
    fn test_success_output_trimmed() {
        let result = ExecutionResult::from_exit(Some(0), "\n4\n", "warning", Duration::ZERO);
        assert!(result.success);
        assert_eq!(result.output, "4");
        assert!(result.error.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_echo_success() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner
            .execute(&tool("echo"), "hello   world", ExecMode::silent())
            .await;

        assert!(result.success);
        assert_eq!(result.output, "hello   world");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner
            .execute(&tool("sh -c 'echo bad >&2; exit 1' sh"), "x", ExecMode::silent())
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("bad"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_empty_output() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner.execute(&tool("true"), "x", ExecMode::silent()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("no output"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_timeout() {
        let runner = ProcessRunner::new(Duration::from_millis(200));
        let result = runner
            .execute(&tool("sleep {prompt}"), "10", ExecMode::silent())
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
        assert!(result.duration < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner
            .execute(&tool("definitely-not-a-real-ai-cli-7f3a"), "x", ExecMode::silent())
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("Command not found"));
    }

    #[tokio::test]
    async fn test_bad_template_is_failure() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner
            .execute(&tool("claude -p \"unterminated"), "x", ExecMode::silent())
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("unbalanced quotes"));
    }
}
