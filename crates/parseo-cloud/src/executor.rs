use std::process::Stdio;

use crate::gcloud::GcloudError;

/// Where the `gcloud` CLI lives on the PATH.
const GCLOUD: &str = "gcloud";

/// Abstraction over gcloud CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
/// Two shapes cover every call site: [`exec`](GcloudExecutor::exec) captures
/// stdout for parsing (service status, check probes), while
/// [`exec_streaming`](GcloudExecutor::exec_streaming) hands the terminal to
/// gcloud for long, chatty operations (build submission, log reads).
#[allow(async_fn_in_trait)]
pub trait GcloudExecutor: Send + Sync {
    /// Execute a gcloud command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, GcloudError>;

    /// Execute a gcloud command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), GcloudError>;
}

/// Real gcloud CLI executor.
pub struct RealExecutor;

impl GcloudExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, GcloudError> {
        tracing::debug!(?args, "gcloud exec");
        let output = tokio::process::Command::new(GCLOUD)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GcloudError::NotFound { source: e })?;

        if !output.status.success() {
            return Err(failure(args, String::from_utf8_lossy(&output.stderr)));
        }
        String::from_utf8(output.stdout).map_err(|e| GcloudError::InvalidUtf8 { source: e })
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), GcloudError> {
        tracing::debug!(?args, "gcloud exec (streaming)");
        let status = tokio::process::Command::new(GCLOUD)
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| GcloudError::NotFound { source: e })?;

        if !status.success() {
            // stderr went to the terminal already; record the exit only
            return Err(failure(args, format!("exit code: {status}")));
        }
        Ok(())
    }
}

fn failure(args: &[String], stderr: impl Into<String>) -> GcloudError {
    GcloudError::CommandFailed {
        args: args.to_vec(),
        stderr: stderr.into(),
    }
}
