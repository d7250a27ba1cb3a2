use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{HeaderMap, HeaderName},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use planforge_config::ChatProviderConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}

/// Single-shot chat completion against an OpenAI-style endpoint. The system
/// instruction is prepended to the history; no streaming.
pub async fn openai_complete(
	cfg: &ChatProviderConfig,
	model: &str,
	system: &str,
	history: &[ChatMessage],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut messages = vec![serde_json::json!({ "role": "system", "content": system })];

	messages.extend(
		history
			.iter()
			.map(|message| serde_json::json!({ "role": message.role, "content": message.content })),
	);

	let body = serde_json::json!({
		"model": model,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_openai_reply(json)
}

/// Anthropic's messages endpoint takes the system instruction as a top-level
/// field and authenticates with `x-api-key` rather than a bearer token.
pub async fn anthropic_complete(
	cfg: &ChatProviderConfig,
	model: &str,
	system: &str,
	history: &[ChatMessage],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": model,
		"max_tokens": cfg.max_tokens,
		"system": system,
		"messages": history,
	});
	let res = client
		.post(url)
		.headers(anthropic_headers(cfg)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_anthropic_reply(json)
}

fn anthropic_headers(cfg: &ChatProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	headers.insert(HeaderName::from_static("x-api-key"), cfg.api_key.parse()?);
	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};
		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}
	Ok(headers)
}

fn parse_openai_reply(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Chat completion response is missing message content."))
}

fn parse_anthropic_reply(json: Value) -> Result<String> {
	json.get("content")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|block| block.get("text"))
		.and_then(|t| t.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Messages response is missing text content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_openai_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "Hello there." } }
			]
		});

		assert_eq!(parse_openai_reply(json).expect("parse failed"), "Hello there.");
	}

	#[test]
	fn rejects_openai_reply_without_choices() {
		let json = serde_json::json!({ "choices": [] });

		assert!(parse_openai_reply(json).is_err());
	}

	#[test]
	fn parses_anthropic_text_block() {
		let json = serde_json::json!({
			"content": [
				{ "type": "text", "text": "Ciao." }
			]
		});

		assert_eq!(parse_anthropic_reply(json).expect("parse failed"), "Ciao.");
	}

	#[test]
	fn rejects_anthropic_reply_without_text() {
		let json = serde_json::json!({ "content": [{ "type": "tool_use" }] });

		assert!(parse_anthropic_reply(json).is_err());
	}
}
