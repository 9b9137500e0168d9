//! External process execution
//!
//! Every git and swift invocation goes through the [`ProcessRunner`] trait so
//! the mirroring workflow can be driven by a recording double in tests. The
//! production runner spawns processes directly with `tokio::process::Command`
//! (no shell) and waits for each one before returning.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Exit status of a finished process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable form used in error messages
    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<std::process::ExitStatus> for RunStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Narrow seam over external process spawning
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` inside `working_dir` and wait for it to exit.
    ///
    /// An `Err` means the process could not be spawned at all; a process that
    /// ran and failed is reported through [`RunStatus`].
    async fn execute(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> std::io::Result<RunStatus>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn execute(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> std::io::Result<RunStatus> {
        debug!(
            cwd = %working_dir.display(),
            "Running {}",
            render_command(program, args)
        );

        // Output is inherited so git progress reaches the user's terminal
        let status = TokioCommand::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .status()
            .await?;

        Ok(status.into())
    }
}

/// Render a command line for logs and error messages
pub fn render_command(program: &Path, args: &[String]) -> String {
    let program = program.to_string_lossy();
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(&*program);
    words.extend(args.iter().map(String::as_str));
    shell_words::join(words)
}

/// Convert a fixed argument list into owned strings
pub fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
