//! Core agent loop implementation.

use std::sync::Arc;

use crate::api::types::{LogEntryType, TaskLogEntry};
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// Final answer of one agent run.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub content: String,
    pub iterations: usize,
    pub log: Vec<TaskLogEntry>,
}

/// The build error analysis agent.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create an agent that talks to `llm` with the default tool set.
    pub fn new(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        let tools = ToolRegistry::new(&config);
        Self::with_tools(config, llm, tools)
    }

    pub fn with_tools(config: Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { config, llm, tools }
    }

    pub fn model(&self) -> &str {
        &self.config.default_model
    }

    /// Forward `prompt` to the model and run the tool calls it asks for
    /// until it produces a final answer.
    pub async fn run(&self, prompt: &str) -> anyhow::Result<AgentResponse> {
        let mut log = Vec::new();

        let mut messages = vec![
            ChatMessage::system(build_system_prompt(&self.tools)),
            ChatMessage::user(prompt),
        ];

        let tool_schemas = self.tools.get_tool_schemas();
        let model = self.config.default_model.as_str();

        for iteration in 0..self.config.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(model, &messages, Some(&tool_schemas))
                .await?;

            tracing::debug!(
                finish_reason = response.finish_reason.as_deref().unwrap_or("none"),
                "Model responded"
            );

            if let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content.clone(),
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    log.push(TaskLogEntry::now(
                        LogEntryType::ToolCall,
                        format!(
                            "Calling tool: {} with args: {}",
                            tool_call.function.name, tool_call.function.arguments
                        ),
                    ));

                    let result_str = match self.execute_tool_call(tool_call).await {
                        Ok(output) => output,
                        Err(e) => format!("Error: {}", e),
                    };

                    log.push(TaskLogEntry::now(
                        LogEntryType::ToolResult,
                        truncate_for_log(&result_str, 1000),
                    ));

                    messages.push(ChatMessage::tool_result(tool_call.id.clone(), result_str));
                }

                continue;
            }

            if let Some(content) = response.content {
                log.push(TaskLogEntry::now(
                    LogEntryType::Response,
                    truncate_for_log(&content, 2000),
                ));
                return Ok(AgentResponse {
                    content,
                    iterations: iteration + 1,
                    log,
                });
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.config.max_iterations
        ))
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
