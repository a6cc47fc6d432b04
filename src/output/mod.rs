//! Decide whether an execution result names an image or is plain text.

use std::path::{Path, PathBuf};

use crate::execution::ExecutionMode;

const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Text(String),
    Image(PathBuf),
}

/// Substring sniffing: any `.png`/`.jpg` in the output counts, not just a
/// deliberate file name.
pub fn mentions_image(result: &str) -> bool {
    IMAGE_SUFFIXES.iter().any(|ext| result.contains(ext))
}

/// Local runs print a full path. Container runs print a bare name that lives
/// in the bind-mounted `script_dir` on the host.
pub fn classify(result: &str, mode: ExecutionMode, script_dir: &Path) -> Display {
    if !mentions_image(result) {
        return Display::Text(result.to_string());
    }
    let name = result.trim();
    match mode {
        ExecutionMode::Docker => Display::Image(script_dir.join(name)),
        ExecutionMode::Local | ExecutionMode::None => Display::Image(PathBuf::from(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_name_joins_mounted_dir() {
        assert_eq!(
            classify("chart.png\n", ExecutionMode::Docker, Path::new("/tmp/abc")),
            Display::Image(PathBuf::from("/tmp/abc/chart.png"))
        );
    }

    #[test]
    fn local_path_is_used_literally() {
        assert_eq!(
            classify(" /tmp/xyz/chart.png\n", ExecutionMode::Local, Path::new("/tmp/abc")),
            Display::Image(PathBuf::from("/tmp/xyz/chart.png"))
        );
    }

    #[test]
    fn jpg_counts_too() {
        assert!(matches!(
            classify("/tmp/photo.jpg", ExecutionMode::Local, Path::new("/tmp")),
            Display::Image(_)
        ));
    }

    #[test]
    fn plain_output_is_text() {
        assert_eq!(
            classify("hello\n", ExecutionMode::Local, Path::new("/tmp")),
            Display::Text("hello\n".into())
        );
    }

    #[test]
    fn suffix_anywhere_in_output_matches() {
        assert!(mentions_image("saved figure to out.png and exiting"));
        assert!(!mentions_image("png without a dot"));
    }
}
