//! Execution engine: mode selection, outcome types and the dispatcher.

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use tracing::info;

use crate::config::Config;

pub mod container;
pub mod error;
pub mod local;
pub mod script;

pub use error::ExecutionError;
pub use script::ScriptFile;

/// Text shown in place of output when a run exceeds its time bound.
pub const TIMEOUT_SENTINEL: &str = ">>> Execution timed out.";

/// Where generated code runs. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Show the generated code only.
    #[default]
    None,
    /// Run directly on the host. Not sandboxed.
    Local,
    /// Run inside a disposable container.
    Docker,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::None => "none",
            ExecutionMode::Local => "local",
            ExecutionMode::Docker => "docker",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(ExecutionMode::None),
            "local" => Ok(ExecutionMode::Local),
            "docker" | "container" => Ok(ExecutionMode::Docker),
            other => Err(format!(
                "unknown execution environment '{}' (expected none, local or docker)",
                other
            )),
        }
    }
}

/// Settings for both strategies. Built from config, then overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    pub python_bin: String,
    pub local_timeout: Duration,
    pub container_runtime: String,
    pub image: String,
    pub container_workdir: String,
    pub container_timeout: Option<Duration>,
    pub script_dir: PathBuf,
}

impl ExecutionOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            python_bin: cfg.python_bin(),
            local_timeout: cfg.execution_timeout(),
            container_runtime: cfg.container_runtime(),
            image: cfg.docker_image(),
            container_workdir: cfg.container_workdir(),
            container_timeout: cfg.container_timeout(),
            script_dir: absolute_dir(cfg.script_dir()),
        }
    }
}

/// Container runtimes reject relative bind-mount sources, so the script
/// directory is always made absolute.
fn absolute_dir(dir: PathBuf) -> PathBuf {
    std::fs::canonicalize(&dir)
        .or_else(|_| std::path::absolute(&dir))
        .unwrap_or(dir)
}

/// What happened when a script was handed to a strategy.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The script ran and exited zero.
    Completed(String),
    /// The script ran and exited non-zero; carries stderr.
    Errored(String),
    TimedOut,
    /// The script could not be run at all.
    Failed {
        mode: ExecutionMode,
        error: ExecutionError,
    },
}

impl ExecutionOutcome {
    /// User-visible text for this outcome.
    pub fn text(&self) -> String {
        match self {
            ExecutionOutcome::Completed(out) | ExecutionOutcome::Errored(out) => out.clone(),
            ExecutionOutcome::TimedOut => TIMEOUT_SENTINEL.to_string(),
            ExecutionOutcome::Failed { mode: ExecutionMode::Docker, error } => {
                format!("Failed running the container: {}", error)
            }
            ExecutionOutcome::Failed { error, .. } => format!("Failed running the script: {}", error),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed(_))
    }
}

/// Run `script` with the strategy for `mode`. The script file is consumed and
/// always removed before this returns. `ExecutionMode::None` runs nothing.
pub async fn dispatch(
    mode: ExecutionMode,
    script: ScriptFile,
    opts: &ExecutionOptions,
) -> Option<ExecutionOutcome> {
    let outcome = match mode {
        ExecutionMode::None => None,
        ExecutionMode::Local => {
            info!("executing on the local machine");
            Some(local::run(&script, &opts.python_bin, opts.local_timeout).await)
        }
        ExecutionMode::Docker => {
            info!(image = %opts.image, "executing in container");
            Some(container::run(&script, &container::ContainerSpec::from_options(opts)).await)
        }
    };
    script.remove();
    outcome
}
