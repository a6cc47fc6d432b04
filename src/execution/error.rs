use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Reasons a generated script could not be run at all.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("refusing to write an empty script")]
    EmptyScript,

    #[error("interpreter `{0}` not found in PATH")]
    InterpreterNotFound(String),

    #[error("container runtime `{0}` not found in PATH")]
    RuntimeUnavailable(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("container exited with {}: {stderr}", status_label(.code))]
    ContainerExit { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (killed by signal)".to_string(),
    }
}
