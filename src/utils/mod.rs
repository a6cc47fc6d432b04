//! Utilities (stdin prompt assembly, platform viewer launch).

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Open `path` with the platform's default viewer without waiting for it.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd.exe");
        c.args(["/c", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path);
    cmd.spawn()
        .with_context(|| format!("failed to launch viewer for {}", path.display()))?;
    Ok(())
}

/// Piped stdin stops at the `__ci__eof__` marker if present.
pub fn stdin_prompt(buf: &str) -> &str {
    match buf.split_once("__ci__eof__") {
        Some((before, _)) => before,
        None => buf,
    }
}

/// Stdin comes first, then the positional prompt.
pub fn combine_prompts(from_stdin: &str, from_args: &str) -> Result<String> {
    let prompt = match (from_stdin.trim().is_empty(), from_args.trim().is_empty()) {
        (false, false) => format!("{}\n\n{}", from_stdin, from_args),
        (false, true) => from_stdin.to_string(),
        (true, false) => from_args.to_string(),
        (true, true) => bail!("Provide a prompt as an argument or via stdin"),
    };
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_marker_truncates_stdin() {
        assert_eq!(stdin_prompt("plot sin(x)__ci__eof__ignored"), "plot sin(x)");
        assert_eq!(stdin_prompt("plot sin(x)"), "plot sin(x)");
    }

    #[test]
    fn stdin_and_argument_are_joined() {
        assert_eq!(combine_prompts("data", "sum it").unwrap(), "data\n\nsum it");
        assert_eq!(combine_prompts("", "sum it").unwrap(), "sum it");
        assert_eq!(combine_prompts("data", " ").unwrap(), "data");
        assert!(combine_prompts("  ", "").is_err());
    }
}
