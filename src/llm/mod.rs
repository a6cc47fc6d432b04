//! Reqwest-based LLM client implementing OpenAI-compatible Chat Completions streaming.

use std::{pin::Pin, time::Duration};

use anyhow::{Context, Result};
use async_stream::try_stream;
use futures_core::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Debug)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60);
        let api_base_url = cfg.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        let base_url = normalize_base_url(&api_base_url);
        let api_key = cfg.get("OPENAI_API_KEY");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url, api_key })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        opts: ChatOptions,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let api_key = self.api_key.clone();

        Box::pin(try_stream! {
            let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("text/event-stream"));
            if let Some(key) = api_key.clone() {
                let hv = HeaderValue::from_str(&format!("Bearer {}", key))?;
                headers.insert(AUTHORIZATION, hv);
            }

            let mut body = serde_json::json!({
                "model": opts.model,
                "temperature": opts.temperature,
                "top_p": opts.top_p,
                "messages": messages,
                "stream": true,
            });
            if let Some(max) = opts.max_tokens {
                body["max_tokens"] = serde_json::json!(max);
            }

            debug!(%url, model = %opts.model, "sending chat request");
            let resp = http
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .context("failed to send chat request")?;

            let resp = match resp.error_for_status() {
                Ok(resp) => resp,
                Err(e) => Err(anyhow::anyhow!("LLM error: {}", e))?,
            };

            let mut lines = LineBuffer::default();
            let mut stream = resp.bytes_stream();
            use futures_util::StreamExt as _;

            while let Some(chunk) = stream.next().await {
                let bytes = chunk.context("stream error")?;
                for line in lines.push(&bytes) {
                    match parse_sse_line(&line) {
                        Some(StreamEvent::Done) => { yield StreamEvent::Done; return; }
                        Some(ev) => yield ev,
                        None => {}
                    }
                }
            }
            // Some servers close the connection without a [DONE] marker
            yield StreamEvent::Done;
        })
    }
}

/// Accumulates raw body bytes and hands back complete lines. Bytes are only
/// decoded once a full line is present, so a multi-byte character split
/// across network chunks stays intact.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let rest = self.buf.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.buf, rest);
            line.pop();
            match String::from_utf8(line) {
                Ok(text) => lines.push(text),
                Err(e) => debug!(error = %e, "dropping non-UTF-8 SSE line"),
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Content(String),
    Done,
}

/// Parse one line of an SSE body into an event. Comments, blank lines,
/// malformed payloads and empty deltas yield `None`.
pub fn parse_sse_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = line.strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(StreamEvent::Done);
    }
    let chunk = serde_json::from_str::<Chunk>(payload).ok()?;
    let text: String = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.and_then(|d| d.content))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(StreamEvent::Content(text))
    }
}

fn normalize_base_url(api_base_url: &str) -> String {
    if api_base_url == "default" {
        return "https://api.openai.com/v1".to_string();
    }
    let trimmed = api_base_url.trim_end_matches('/');
    if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
        format!("{}/v1", trimmed)
    } else {
        trimmed.to_string()
    }
}

// Minimal chunk structures for OpenAI-like streaming
#[derive(Debug, Deserialize)]
struct Chunk {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_delta_is_yielded() {
        let line = r#"data: {"id":"x","choices":[{"delta":{"content":"```python\n"},"finish_reason":null}]}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(StreamEvent::Content("```python\n".into()))
        );
    }

    #[test]
    fn multibyte_char_split_across_chunks_survives() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"print('\u{e9}')\"}}]}\n";
        let bytes = line.as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut lines = LineBuffer::default();
        assert!(lines.push(&bytes[..split]).is_empty());
        let complete = lines.push(&bytes[split..]);
        assert_eq!(complete.len(), 1);
        assert_eq!(
            parse_sse_line(&complete[0]),
            Some(StreamEvent::Content("print('\u{e9}')".into()))
        );
    }

    #[test]
    fn several_lines_in_one_chunk() {
        let mut lines = LineBuffer::default();
        let out = lines.push(b"data: a\n\ndata: [DONE]\npartial");
        assert_eq!(out, vec!["data: a".to_string(), String::new(), "data: [DONE]".to_string()]);
        assert_eq!(lines.push(b"\n"), vec!["partial".to_string()]);
    }

    #[test]
    fn done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(StreamEvent::Done));
    }

    #[test]
    fn comments_blank_and_garbage_are_skipped() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("data: {not json"), None);
        assert_eq!(parse_sse_line("event: ping"), None);
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
    }

    #[test]
    fn base_url_gets_v1_suffix() {
        assert_eq!(normalize_base_url("default"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("http://localhost:1234/"), "http://localhost:1234/v1");
        assert_eq!(normalize_base_url("http://localhost:1234/v1/"), "http://localhost:1234/v1");
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let msg = ChatMessage::new(Role::System, "rules");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "rules");
    }
}
