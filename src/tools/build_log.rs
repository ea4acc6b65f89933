//! Build log retrieval.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};
use crate::config::LogSourceConfig;

/// Read a build log from a local path or a CI URL.
pub struct ReadBuildLog {
    config: LogSourceConfig,
}

impl ReadBuildLog {
    pub fn new(config: LogSourceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for ReadBuildLog {
    fn name(&self) -> &str {
        "read_build_log"
    }

    fn description(&self) -> &str {
        "Read the full contents of a build log from a local file path or a URL (for example a Jenkins job). Returns the log text, or an error message describing why the log could not be read."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "Local build log file path or URL"
                }
            },
            "required": ["source"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let source = required_str(&args, "source")?;
        Ok(read_build_log(source, &self.config).await)
    }
}

/// Return the log text for `source`. Failures come back as text.
pub async fn read_build_log(source: &str, config: &LogSourceConfig) -> String {
    if is_url(source) {
        if config.fetch_remote {
            return fetch_log(source, config).await;
        }
        return placeholder_log(source);
    }

    match tokio::fs::try_exists(source).await {
        Ok(true) => match tokio::fs::read_to_string(source).await {
            Ok(content) => content,
            Err(e) => format!("Failed to read build log: {}", e),
        },
        _ => format!("Error: build log source ({}) not found.", source),
    }
}

fn is_url(source: &str) -> bool {
    source
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

fn placeholder_log(source: &str) -> String {
    format!(
        "Placeholder Jenkins log (URL: {}):\n...\nERROR: CXX compile failed in file_A.cc:200\nERROR: Undefined reference to 'function_X' in file_B.cpp\n...\n",
        source
    )
}

async fn fetch_log(url: &str, config: &LogSourceConfig) -> String {
    match try_fetch(url, config).await {
        Ok(body) => truncate_log(body, config.max_log_bytes),
        Err(e) => {
            tracing::warn!(url, error = %e, "Build log fetch failed");
            format!("Failed to fetch build log from {}: {}", url, e)
        }
    }
}

async fn try_fetch(url: &str, config: &LogSourceConfig) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("build-triage/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("HTTP error: {}", status));
    }

    Ok(response.text().await?)
}

/// Keep the last `max_bytes` of an oversized log.
fn truncate_log(body: String, max_bytes: usize) -> String {
    if body.len() <= max_bytes {
        return body;
    }
    let mut start = body.len() - max_bytes;
    while !body.is_char_boundary(start) {
        start += 1;
    }
    format!("[log truncated, showing last {} bytes]\n{}", body.len() - start, &body[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn url_returns_placeholder_with_errors() {
        let log = read_build_log("https://ci.example/job/42", &LogSourceConfig::default()).await;
        assert!(log.contains("ERROR: CXX compile failed"));
        assert!(log.contains("https://ci.example/job/42"));
    }

    #[tokio::test]
    async fn url_prefix_is_case_insensitive() {
        let log = read_build_log("HTTP://CI.EXAMPLE/job/7", &LogSourceConfig::default()).await;
        assert!(log.contains("ERROR"));
    }

    #[tokio::test]
    async fn local_file_is_returned_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let content = "step 1\nerror: expected ';' in file_C.cc:12\n";
        file.write_all(content.as_bytes()).unwrap();

        let log = read_build_log(file.path().to_str().unwrap(), &LogSourceConfig::default()).await;
        assert_eq!(log, content);
    }

    #[tokio::test]
    async fn missing_source_reports_not_found() {
        let log = read_build_log("/no/such/build.log", &LogSourceConfig::default()).await;
        assert!(log.contains("/no/such/build.log"));
        assert!(log.contains("not found"));
    }

    #[tokio::test]
    async fn unreadable_source_reports_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let log = read_build_log(dir.path().to_str().unwrap(), &LogSourceConfig::default()).await;
        assert!(log.starts_with("Failed to read build log:"));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_as_text() {
        let config = LogSourceConfig {
            fetch_remote: true,
            fetch_timeout_secs: 2,
            ..LogSourceConfig::default()
        };
        let log = read_build_log("http://127.0.0.1:1/job/1", &config).await;
        assert!(log.starts_with("Failed to fetch build log from http://127.0.0.1:1/job/1"));
    }

    async fn spawn_log_server() -> String {
        use axum::http::StatusCode;
        use axum::routing::get;

        let app = axum::Router::new()
            .route("/job/1/console", get(|| async { "aaaaaERROR: é" }))
            .route("/job/2/console", get(|| async { (StatusCode::NOT_FOUND, "gone") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetching(max_log_bytes: usize) -> LogSourceConfig {
        LogSourceConfig {
            fetch_remote: true,
            max_log_bytes,
            fetch_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn fetched_log_is_returned_whole_under_cap() {
        let base = spawn_log_server().await;
        let log = read_build_log(&format!("{}/job/1/console", base), &fetching(1024)).await;
        assert_eq!(log, "aaaaaERROR: é");
    }

    #[tokio::test]
    async fn fetched_log_keeps_tail_over_cap() {
        let base = spawn_log_server().await;
        let log = read_build_log(&format!("{}/job/1/console", base), &fetching(6)).await;
        assert_eq!(log, "[log truncated, showing last 6 bytes]\nOR: é");
    }

    #[tokio::test]
    async fn fetch_error_status_is_reported_as_text() {
        let base = spawn_log_server().await;
        let url = format!("{}/job/2/console", base);
        let log = read_build_log(&url, &fetching(1024)).await;
        assert_eq!(
            log,
            format!("Failed to fetch build log from {}: HTTP error: 404 Not Found", url)
        );
    }

    #[test]
    fn short_prefixes_are_not_urls() {
        assert!(!is_url("htt"));
        assert!(!is_url(""));
        assert!(is_url("https://x"));
    }

    #[test]
    fn truncation_moves_start_past_split_char() {
        // Cut lands inside 'é'; the partial char is dropped.
        assert_eq!(
            truncate_log("xéy".to_string(), 2),
            "[log truncated, showing last 1 bytes]\ny"
        );
        assert_eq!(
            truncate_log("xxé".to_string(), 1),
            "[log truncated, showing last 0 bytes]\n"
        );
    }

    #[test]
    fn truncation_leaves_short_logs_alone() {
        assert_eq!(truncate_log("ok".to_string(), 2), "ok");
    }
}
