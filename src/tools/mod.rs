//! Tools exposed to the model.
//!
//! Every tool reports its own failures as text in the returned string so the
//! model can read them. An `Err` is only produced when the call itself is
//! malformed (missing or mistyped arguments, unknown tool name).

mod build_log;
mod email;
mod git;

pub use build_log::{read_build_log, ReadBuildLog};
pub use email::{send_email_to_developer, ConsoleMailer, Mailer, Notification, SendEmail};
pub use git::{find_last_modifier, FindLastModifier};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::llm::{FunctionSchema, ToolSchema};

/// A callable operation the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// The fixed set of tools handed to the agent.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Register the build-triage tools, printing notifications to the console.
    pub fn new(config: &Config) -> Self {
        Self::with_mailer(config, Arc::new(ConsoleMailer::new(&config.email_sender)))
    }

    /// Register the build-triage tools with a custom mail sink.
    pub fn with_mailer(config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(ReadBuildLog::new(config.log_source.clone())),
            Box::new(FindLastModifier::new(config.modifier_lookup.clone())),
            Box::new(SendEmail::new(mailer)),
        ];
        Self { tools }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema {
                tool_type: "function".to_string(),
                function: FunctionSchema {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    /// Run the named tool.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tracing::info!(tool = name, "Executing tool");
        tool.execute(args).await
    }
}

/// Fetch a required string argument.
fn required_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(&Config::new("key".to_string(), "gemini-2.5-flash".to_string()))
    }

    #[test]
    fn registers_three_tools_in_order() {
        let names: Vec<String> = registry().list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["read_build_log", "find_last_modifier", "send_email_to_developer"]
        );
    }

    #[test]
    fn schemas_are_function_objects_with_required_args() {
        let schemas = registry().get_tool_schemas();
        let email = schemas
            .iter()
            .find(|s| s.function.name == "send_email_to_developer")
            .unwrap();
        assert_eq!(email.tool_type, "function");
        assert_eq!(
            email.function.parameters["required"],
            json!(["recipient_email", "subject", "body"])
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = registry().execute("delete_repo", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool: delete_repo"));
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let out = registry()
            .execute("find_last_modifier", json!({ "file_path": "/src/file_B.cpp" }))
            .await
            .unwrap();
        assert_eq!(out, "developer_B@company.com");
    }

    #[tokio::test]
    async fn missing_argument_is_an_error() {
        let err = registry()
            .execute("read_build_log", json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Missing 'source' argument"));
    }
}
