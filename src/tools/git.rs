//! Last-modifier lookup.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;

use super::{required_str, Tool};
use crate::config::ModifierLookup;

/// Path fragments with a known owner, used when no repository is configured.
const STUB_OWNERS: &[(&str, &str)] = &[
    ("file_A.cc", "developer_A@company.com"),
    ("file_B.cpp", "developer_B@company.com"),
];

/// Find the email of the developer who last changed a file.
pub struct FindLastModifier {
    lookup: ModifierLookup,
}

impl FindLastModifier {
    pub fn new(lookup: ModifierLookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for FindLastModifier {
    fn name(&self) -> &str {
        "find_last_modifier"
    }

    fn description(&self) -> &str {
        "Look up the email address of the developer who most recently modified the given source file, using the repository history. Use it on the file that caused the compile error."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the source file that caused the compile error"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let file_path = required_str(&args, "file_path")?;
        Ok(match find_last_modifier(file_path, &self.lookup).await {
            Some(email) => email,
            None => format!("No last modifier found for {}", file_path),
        })
    }
}

/// Return the last modifier's email, or `None` when the file has no known owner.
pub async fn find_last_modifier(file_path: &str, lookup: &ModifierLookup) -> Option<String> {
    match lookup {
        ModifierLookup::Stub => STUB_OWNERS
            .iter()
            .find(|(fragment, _)| file_path.contains(fragment))
            .map(|(_, email)| email.to_string()),
        ModifierLookup::Git { repo } => {
            match run_git_command(&["log", "-1", "--format=%ae", "--", file_path], repo).await {
                Ok(out) => Some(out.trim().to_string()).filter(|email| !email.is_empty()),
                Err(e) => {
                    tracing::warn!(file_path, error = %e, "git lookup failed");
                    None
                }
            }
        }
    }
}

/// Run a git command and return its output.
async fn run_git_command(args: &[&str], repo: &Path) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run git: {}", e))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        if stderr.is_empty() {
            return Err(anyhow::anyhow!("Git command failed: {}", stdout.trim()));
        }
        return Err(anyhow::anyhow!("Git error: {}", stderr.trim()));
    }

    Ok(stdout.to_string())
}
