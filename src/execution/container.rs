//! Container strategy: run the script in a throwaway container via the runtime CLI.

use std::{process::Stdio, time::Duration};

use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{script::ScriptFile, ExecutionError, ExecutionMode, ExecutionOptions, ExecutionOutcome};

/// Everything needed to start one container.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Runtime CLI, `docker` or `podman`.
    pub runtime: String,
    pub image: String,
    /// Where the script directory is mounted inside the container.
    pub workdir: String,
    pub timeout: Option<Duration>,
}

impl ContainerSpec {
    pub fn from_options(opts: &ExecutionOptions) -> Self {
        Self {
            runtime: opts.container_runtime.clone(),
            image: opts.image.clone(),
            workdir: opts.container_workdir.clone(),
            timeout: opts.container_timeout,
        }
    }

    /// Arguments for `<runtime> run ...`: auto-removed, named, with the
    /// script's directory bind-mounted read-write at `workdir`.
    pub fn run_args(&self, container_name: &str, script: &ScriptFile) -> Vec<String> {
        let workdir = self.workdir.trim_end_matches('/');
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.to_string(),
            "-v".to_string(),
            format!("{}:{}:rw", script.dir().display(), workdir),
            self.image.clone(),
            "python".to_string(),
            format!("{}/{}", workdir, script.file_name()),
        ]
    }
}

pub async fn run(script: &ScriptFile, spec: &ContainerSpec) -> ExecutionOutcome {
    let runtime = match which::which(&spec.runtime) {
        Ok(p) => p,
        Err(_) => return failed(ExecutionError::RuntimeUnavailable(spec.runtime.clone())),
    };

    let name = format!("code-interpreter-{}", Uuid::new_v4());
    let args = spec.run_args(&name, script);
    debug!(runtime = %runtime.display(), ?args, "starting container");

    let mut cmd = Command::new(&runtime);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            return failed(ExecutionError::Spawn {
                program: runtime.display().to_string(),
                source,
            })
        }
    };

    let output = match spec.timeout {
        None => child.wait_with_output().await,
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(res) => res,
            Err(_) => {
                warn!(container = %name, timeout_secs = limit.as_secs_f64(), "container timed out");
                kill_container(&spec.runtime, &name).await;
                return ExecutionOutcome::TimedOut;
            }
        },
    };

    match output {
        Ok(output) if output.status.success() => {
            info!(container = %name, "container run completed");
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                debug!(container = %name, stderr = %stderr.trim_end(), "container stderr");
            }
            ExecutionOutcome::Completed(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => failed(ExecutionError::ContainerExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Err(e) => failed(ExecutionError::Io(e)),
    }
}

/// The CLI client dying does not stop the container, so kill it by name.
async fn kill_container(runtime: &str, name: &str) {
    let res = Command::new(runtime)
        .args(["kill", name])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    if let Err(e) = res {
        warn!(container = %name, error = %e, "failed to kill container");
    }
}

fn failed(error: ExecutionError) -> ExecutionOutcome {
    ExecutionOutcome::Failed { mode: ExecutionMode::Docker, error }
}
