//! External tool runner
//!
//! Every ffmpeg/ffprobe invocation goes through [`ToolRunner`]. The process-backed
//! implementation enforces a wall-clock deadline and kills the child when the
//! calling future is dropped, so a client disconnect stops the running tool.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout followed by stderr, for diagnostics.
    pub fn combined(&self) -> String {
        combine(&self.stdout, &self.stderr)
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Failed {
        command: String,
        args: Vec<String>,
        status: String,
        output: String,
    },

    #[error("{command} timed out after {}s", .timeout.as_secs())]
    TimedOut {
        command: String,
        args: Vec<String>,
        timeout: Duration,
    },
}

impl ToolError {
    pub fn command(&self) -> &str {
        match self {
            ToolError::Spawn { command, .. }
            | ToolError::Failed { command, .. }
            | ToolError::TimedOut { command, .. } => command,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            ToolError::Spawn { .. } => &[],
            ToolError::Failed { args, .. } | ToolError::TimedOut { args, .. } => args,
        }
    }

    /// Captured tool output, if the tool ran to completion.
    pub fn output(&self) -> Option<&str> {
        match self {
            ToolError::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Executes an external program. Never retries.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError>;
}

/// Runs tools as child processes under a fixed deadline.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
        let start = std::time::Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                command: program.to_string(),
                source,
            })?;

        // On timeout the wait future is dropped, which kills the child.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ToolError::Spawn {
                command: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(ToolError::TimedOut {
                    command: program.to_string(),
                    args: args.to_vec(),
                    timeout: self.timeout,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: program.to_string(),
                args: args.to_vec(),
                status: output.status.to_string(),
                output: combine(&stdout, &stderr),
            });
        }

        tracing::debug!(
            command = %program,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "External tool finished"
        );

        Ok(ToolOutput { stdout, stderr })
    }
}

fn combine(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, _) => stderr.to_string(),
        (_, true) => stdout.to_string(),
        _ => format!("{}\n{}", stdout.trim_end(), stderr),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = ProcessRunner::new(Duration::from_secs(10));
        let output = runner.run("sh", &sh("echo 640x360")).await.unwrap();
        assert_eq!(output.stdout.trim(), "640x360");
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let runner = ProcessRunner::new(Duration::from_secs(10));
        let err = runner
            .run("sh", &sh("echo bad input >&2; exit 3"))
            .await
            .unwrap_err();

        assert_eq!(err.command(), "sh");
        assert_eq!(err.args().len(), 2);
        assert!(err.output().unwrap().contains("bad input"));
        assert!(matches!(err, ToolError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let runner = ProcessRunner::new(Duration::from_millis(100));
        let err = runner.run("sleep", &["5".to_string()]).await.unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessRunner::new(Duration::from_secs(1));
        let err = runner
            .run("vidopt-definitely-not-installed", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine("", "err"), "err");
        assert_eq!(combine("out", ""), "out");
        assert_eq!(combine("out\n", "err"), "out\nerr");
    }
}
