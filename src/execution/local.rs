//! Host interpreter strategy: run the script as a child process with a hard timeout.

use std::{process::Stdio, time::Duration};

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{script::ScriptFile, ExecutionError, ExecutionMode, ExecutionOutcome};

pub async fn run(script: &ScriptFile, python_bin: &str, timeout: Duration) -> ExecutionOutcome {
    let python = match which::which(python_bin) {
        Ok(p) => p,
        Err(_) => return failed(ExecutionError::InterpreterNotFound(python_bin.to_string())),
    };

    let mut cmd = Command::new(&python);
    cmd.arg(script.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env("PYTHONIOENCODING", "utf-8")
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            return failed(ExecutionError::Spawn {
                program: python.display().to_string(),
                source,
            })
        }
    };
    debug!(pid = ?child.id(), interpreter = %python.display(), "script started");

    // Dropping the pending future on timeout drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            info!(status = %output.status, "running code completed");
            if output.status.success() {
                ExecutionOutcome::Completed(String::from_utf8_lossy(&output.stdout).into_owned())
            } else {
                ExecutionOutcome::Errored(String::from_utf8_lossy(&output.stderr).into_owned())
            }
        }
        Ok(Err(e)) => failed(ExecutionError::Io(e)),
        Err(_) => {
            warn!(timeout_secs = timeout.as_secs_f64(), "script timed out");
            ExecutionOutcome::TimedOut
        }
    }
}

fn failed(error: ExecutionError) -> ExecutionOutcome {
    ExecutionOutcome::Failed { mode: ExecutionMode::Local, error }
}
