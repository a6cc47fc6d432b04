//! Pull fenced code out of a model reply.

use anyhow::Result;
use regex::Regex;
use tracing::{debug, info};

/// Finds the first fenced block tagged with a given language.
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    pattern: Regex,
}

impl CodeExtractor {
    pub fn new(language: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?s)```{}\n(.*?)```", regex::escape(language)))?;
        Ok(Self { pattern })
    }

    pub fn python() -> Result<Self> {
        Self::new("python")
    }

    /// Body of the first matching block, without fences or tag. `None` when
    /// the reply has no such block.
    pub fn extract(&self, reply: &str) -> Option<String> {
        match self.pattern.captures(reply).and_then(|c| c.get(1)) {
            Some(body) => {
                debug!(start = body.start(), end = body.end(), "code match");
                Some(body.as_str().to_string())
            }
            None => {
                info!("no code block found in the response");
                None
            }
        }
    }
}
