//! Gemini client over the OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatResponse, LlmClient, ToolCall, ToolSchema};

/// HTTP client for Gemini's `/chat/completions` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSchema]>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiClient {
    /// Build the client. Fails if the underlying HTTP client cannot be
    /// constructed or the key is empty.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            anyhow::bail!("Gemini API key is empty");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("build-triage/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> anyhow::Result<ChatResponse> {
        let request = ChatRequest {
            model,
            messages,
            tools: tools.filter(|t| !t.is_empty()),
        };

        tracing::debug!(model, messages = messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat completion request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read chat completion response")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Gemini API error ({}): {}",
                status,
                error_message(&body)
            ));
        }

        parse_completion(&body)
    }
}

/// Pull the first choice out of a completion body.
fn parse_completion(body: &str) -> anyhow::Result<ChatResponse> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).context("Failed to parse chat completion response")?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Chat completion response contained no choices"))?;

    Ok(ChatResponse {
        content: choice.message.content.filter(|c| !c.trim().is_empty()),
        tool_calls: choice.message.tool_calls,
        finish_reason: choice.finish_reason,
    })
}

/// Gemini returns either `{"error": {...}}` or a list of those.
fn error_message(body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        return err.error.message;
    }
    if let Ok(errs) = serde_json::from_str::<Vec<ErrorBody>>(body) {
        if let Some(err) = errs.into_iter().next() {
            return err.error.message;
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(GeminiClient::new("  ", "https://example.invalid", 5).is_err());
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GeminiClient::new("key", "https://example.invalid/v1beta/openai/", 5).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.invalid/v1beta/openai/chat/completions"
        );
    }

    #[test]
    fn parses_tool_call_response() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_0",
                        "type": "function",
                        "function": {"name": "find_last_modifier", "arguments": "{\"file_path\":\"file_A.cc\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let response = parse_completion(body).unwrap();
        assert!(response.content.is_none());
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "find_last_modifier");
        assert_eq!(response.finish_reason.as_deref(), Some("tool_calls"));
    }

    #[test]
    fn blank_content_is_treated_as_absent() {
        let body = r#"{"choices":[{"message":{"content":"   "},"finish_reason":"stop"}]}"#;
        assert!(parse_completion(body).unwrap().content.is_none());
    }

    #[test]
    fn no_choices_is_an_error() {
        assert!(parse_completion(r#"{"choices":[]}"#).is_err());
    }

    #[test]
    fn error_message_unwraps_both_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(
            error_message(r#"[{"error":{"code":429,"message":"quota"}}]"#),
            "quota"
        );
        assert_eq!(error_message(" bad gateway "), "bad gateway");
    }
}
