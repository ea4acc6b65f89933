//! Build error workflow entry point.

use crate::agent::{Agent, AgentResponse};

/// Instruction handed to the agent for a log source.
pub fn build_workflow_prompt(log_source: &str) -> String {
    format!(
        "Analyze the following build log source and start the error response: {}",
        log_source
    )
}

/// Run the full workflow and return the agent's response with its execution log.
pub async fn analyze_build_log(agent: &Agent, log_source: &str) -> anyhow::Result<AgentResponse> {
    tracing::info!(log_source, "Starting build error workflow");

    let response = agent.run(&build_workflow_prompt(log_source)).await?;

    tracing::info!(
        iterations = response.iterations,
        tool_calls = response
            .log
            .iter()
            .filter(|e| e.entry_type == crate::api::types::LogEntryType::ToolCall)
            .count(),
        "Build error workflow finished"
    );

    Ok(response)
}

/// Analyze `log_source` and return the agent's final text.
pub async fn run_build_error_workflow(agent: &Agent, log_source: &str) -> anyhow::Result<String> {
    Ok(analyze_build_log(agent, log_source).await?.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_source() {
        let prompt = build_workflow_prompt("/var/log/build.log");
        assert!(prompt.ends_with(": /var/log/build.log"));
    }
}
