use std::io::{self, Read};

use anyhow::Result;
use code_interpreter::{
    cli::Cli,
    config::Config,
    execution::{ExecutionMode, ExecutionOptions},
    handlers::interpret::{self, RunRequest},
    llm::ChatOptions,
    role::system_prompt,
    utils,
};
use is_terminal::IsTerminal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let cfg = Config::load();

    // Execution environment: CLI overrides config
    let mode = match args.exec {
        Some(mode) => mode,
        None => cfg
            .get("DEFAULT_EXECUTION_ENV")
            .unwrap_or_default()
            .parse::<ExecutionMode>()
            .map_err(anyhow::Error::msg)?,
    };

    let mut exec = ExecutionOptions::from_config(&cfg);
    if let Some(secs) = args.timeout {
        exec.local_timeout = Duration::from_secs(secs);
    }
    if let Some(image) = args.image.clone() {
        exec.image = image;
    }

    if args.show_prompt {
        println!("{}", system_prompt(mode, &exec.container_workdir));
        return Ok(());
    }

    // stdin handling (pipe support with __ci__eof__ delimiter)
    let mut from_stdin = String::new();
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        from_stdin = utils::stdin_prompt(&buf).to_string();
    }
    let prompt = utils::combine_prompts(&from_stdin, args.prompt.as_deref().unwrap_or_default())?;

    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN")
    };

    // Resolve model: CLI overrides config; fall back to DEFAULT_MODEL
    let model = args
        .model
        .clone()
        .or_else(|| cfg.get("DEFAULT_MODEL"))
        .unwrap_or_else(|| "gpt-4o".to_string());

    let req = RunRequest {
        prompt,
        mode,
        chat: ChatOptions {
            model,
            temperature: args.temperature,
            top_p: args.top_p,
            max_tokens: args.max_tokens,
        },
        exec,
        markdown,
        open_images: args.open,
    };
    interpret::run(&cfg, req).await
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "code_interpreter=info",
        _ => "code_interpreter=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
