use clap::{ArgGroup, Parser};

use crate::execution::ExecutionMode;

#[derive(Parser, Debug, Clone)]
#[command(name = "code-interpreter", about = "Generate Python with an LLM and optionally run it", version)]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
pub struct Cli {
    /// The prompt to generate code for.
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Environment to execute the generated code in.
    ///
    /// Be careful running arbitrary code on your local machine.
    /// - none: do not run the generated code.
    /// - docker: run code inside a docker container.
    /// - local: run code directly on your local machine.
    #[arg(short = 'x', long = "exec", value_name = "ENV")]
    pub exec: Option<ExecutionMode>,

    /// Large language model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Randomness of generated output.
    #[arg(long, default_value_t = 0.0, value_parser = clap::value_parser!(f32))]
    pub temperature: f32,

    /// Limits highest probable tokens (words).
    #[arg(long = "top-p", default_value_t = 1.0, value_parser = clap::value_parser!(f32))]
    pub top_p: f32,

    /// Maximum tokens in the model reply.
    #[arg(long = "max-tokens")]
    pub max_tokens: Option<u32>,

    /// Wall-clock limit in seconds for local execution.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Container image used with `--exec docker`.
    #[arg(long)]
    pub image: Option<String>,

    /// Render the reply as Markdown once it has fully arrived.
    #[arg(long)]
    pub md: bool,
    /// Print reply chunks as they arrive.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// Open image results in the system viewer.
    #[arg(long)]
    pub open: bool,

    /// Print the system prompt for the chosen environment and exit.
    #[arg(long = "show-prompt")]
    pub show_prompt: bool,

    /// Verbose diagnostics on stderr (same as RUST_LOG=code_interpreter=debug).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_flag_parses_mode() {
        let cli = Cli::try_parse_from(["code-interpreter", "-x", "docker", "plot a sine wave"]).unwrap();
        assert_eq!(cli.exec, Some(ExecutionMode::Docker));
        assert_eq!(cli.prompt.as_deref(), Some("plot a sine wave"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["code-interpreter", "--exec", "vm", "hi"]).is_err());
    }

    #[test]
    fn md_switches_conflict() {
        assert!(Cli::try_parse_from(["code-interpreter", "--md", "--no-md", "hi"]).is_err());
    }
}
