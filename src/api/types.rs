//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to analyze a build log.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Local path or URL of the build log
    pub log_source: String,
}

/// Result of a build log analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    /// Final analysis text from the agent
    pub response: String,

    /// Number of model round trips
    pub iterations: usize,

    /// Detailed execution log
    pub log: Vec<TaskLogEntry>,
}

/// A single entry in the execution log.
#[derive(Debug, Clone, Serialize)]
pub struct TaskLogEntry {
    /// Timestamp (RFC 3339)
    pub timestamp: String,

    pub entry_type: LogEntryType,

    pub content: String,
}

impl TaskLogEntry {
    pub fn now(entry_type: LogEntryType, content: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            entry_type,
            content: content.into(),
        }
    }
}

/// Types of log entries.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Agent produced final response
    Response,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model the agent talks to
    pub model: String,
}
