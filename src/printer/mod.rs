//! Printers: text, markdown (termimad) and execution results.

use owo_colors::OwoColorize;
use termimad::MadSkin;
use tracing::warn;

use crate::{execution::ExecutionOutcome, output::Display, utils::open_in_viewer};

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "yellow" => println!("{}", text.yellow()),
                "red" => println!("{}", text.red()),
                _ => println!("{}", text),
            }
        } else {
            println!("{}", text);
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) { self.skin.print_text(text); println!(); }
}

/// Renders what came back from running the script.
pub struct ResultPrinter {
    pub open_images: bool,
}

impl ResultPrinter {
    pub fn print(&self, outcome: &ExecutionOutcome, display: &Display, raw: &str) {
        println!("{}", "── result ──".cyan());
        match display {
            Display::Text(text) => TextPrinter { color: color_for(outcome) }.print(text.trim_end()),
            Display::Image(path) if path.exists() => {
                println!("{} {}", "image:".green(), path.display());
                if self.open_images {
                    if let Err(e) = open_in_viewer(path) {
                        warn!(path = %path.display(), error = %e, "could not open image viewer");
                    }
                }
            }
            Display::Image(path) => {
                warn!(path = %path.display(), "result names an image that does not exist");
                TextPrinter { color: None }.print(raw.trim_end());
            }
        }
    }
}

/// Failures print red, a timeout yellow, normal output uncolored.
fn color_for(outcome: &ExecutionOutcome) -> Option<&'static str> {
    match outcome {
        ExecutionOutcome::Completed(_) => None,
        ExecutionOutcome::TimedOut => Some("yellow"),
        ExecutionOutcome::Errored(_) | ExecutionOutcome::Failed { .. } => Some("red"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{ExecutionError, ExecutionMode};

    #[test]
    fn outcome_colors() {
        assert_eq!(color_for(&ExecutionOutcome::Completed("ok".into())), None);
        assert_eq!(color_for(&ExecutionOutcome::TimedOut), Some("yellow"));
        assert_eq!(color_for(&ExecutionOutcome::Errored("Traceback".into())), Some("red"));
        let failed = ExecutionOutcome::Failed {
            mode: ExecutionMode::Docker,
            error: ExecutionError::RuntimeUnavailable("docker".into()),
        };
        assert_eq!(color_for(&failed), Some("red"));
    }
}
