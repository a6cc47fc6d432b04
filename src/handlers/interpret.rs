//! Code interpreter handler: prompt → streamed reply → extracted code → run → display.

use std::io::Write;

use anyhow::Result;
use futures_util::StreamExt;
use tracing::info;

use crate::{
    config::Config,
    execution::{self, ExecutionMode, ExecutionOptions, ExecutionOutcome, ScriptFile},
    extract::CodeExtractor,
    llm::{ChatMessage, ChatOptions, LlmClient, Role, StreamEvent},
    output::{classify, Display},
    printer::{MarkdownPrinter, ResultPrinter},
    role::system_prompt,
};

/// One user-triggered run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub prompt: String,
    pub mode: ExecutionMode,
    pub chat: ChatOptions,
    pub exec: ExecutionOptions,
    pub markdown: bool,
    pub open_images: bool,
}

/// Result of running the code found in a reply.
#[derive(Debug)]
pub struct RunResult {
    pub outcome: ExecutionOutcome,
    pub display: Display,
}

pub async fn run(cfg: &Config, req: RunRequest) -> Result<()> {
    let client = LlmClient::from_config(cfg)?;
    let messages = vec![
        ChatMessage::new(Role::System, system_prompt(req.mode, &req.exec.container_workdir)),
        ChatMessage::new(Role::User, req.prompt.clone()),
    ];

    info!(model = %req.chat.model, mode = %req.mode, base_url = client.base_url(), "sending prompt");
    let reply = stream_reply(&client, messages, req.chat.clone(), req.markdown).await?;

    if let Some(result) = run_reply(&reply, req.mode, &req.exec).await? {
        let raw = result.outcome.text();
        ResultPrinter { open_images: req.open_images }.print(&result.outcome, &result.display, &raw);
    }
    Ok(())
}

/// Extract the first python block from `reply` and run it under `mode`.
/// `Ok(None)` when there is nothing to run: no code, empty code, or
/// execution disabled.
pub async fn run_reply(
    reply: &str,
    mode: ExecutionMode,
    opts: &ExecutionOptions,
) -> Result<Option<RunResult>> {
    let code = match CodeExtractor::python()?.extract(reply) {
        Some(code) if !code.trim().is_empty() => code,
        Some(_) => {
            info!("code block is empty; nothing to run");
            return Ok(None);
        }
        None => return Ok(None),
    };
    if mode == ExecutionMode::None {
        info!("execution disabled; showing generated code only");
        return Ok(None);
    }

    let script = ScriptFile::create_in(&opts.script_dir, &code)?;
    let script_dir = script.dir().to_path_buf();
    let Some(outcome) = execution::dispatch(mode, script, opts).await else {
        return Ok(None);
    };

    let text = outcome.text();
    // Only output of a successful run may name an image; a traceback that
    // mentions `.png`/`.jpg` stays text.
    let shown = if outcome.is_completed() {
        classify(&text, mode, &script_dir)
    } else {
        Display::Text(text)
    };
    info!(result = ?shown, "result classified");
    Ok(Some(RunResult { outcome, display: shown }))
}

async fn stream_reply(
    client: &LlmClient,
    messages: Vec<ChatMessage>,
    opts: ChatOptions,
    markdown: bool,
) -> Result<String> {
    let mut stream = client.chat_stream(messages, opts);
    let mut reply = String::new();
    let mut stdout = std::io::stdout();
    while let Some(ev) = stream.next().await {
        match ev? {
            StreamEvent::Content(t) => {
                reply.push_str(&t);
                if !markdown {
                    print!("{}", t);
                    stdout.flush().ok();
                }
            }
            StreamEvent::Done => {
                if !markdown {
                    println!();
                }
                break;
            }
        }
    }
    if markdown && !reply.is_empty() {
        MarkdownPrinter::default().print(&reply);
    }
    Ok(reply)
}
