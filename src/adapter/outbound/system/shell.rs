//! Shell command execution.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::port::CommandRunner;

/// Runs commands with `sh -c`, inheriting stdout and stderr.
///
/// Logging is left to the calling module.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<i32> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .await
            .map_err(|e| Error::Command(format!("failed to spawn '{command}': {e}")))?;

        // Killed by a signal: no exit code.
        Ok(status.code().unwrap_or(-1))
    }
}
