//! build-triage - CLI and HTTP server entry point.

use std::sync::Arc;

use build_triage::{agent::Agent, api, config::Config, llm::GeminiClient, workflow};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "build-triage", version, about = "Analyze build failures and notify the responsible developer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one build log (local path or URL) and print the result
    Analyze {
        /// Build log file path or URL
        log_source: String,
    },
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "build_triage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.default_model);

    // Client construction failure is fatal.
    let llm = match GeminiClient::new(&config.api_key, &config.base_url, config.request_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("FATAL: failed to initialize Gemini client: {:#}", e);
            std::process::exit(1);
        }
    };
    info!("Gemini client initialized");

    match cli.command {
        Command::Analyze { log_source } => {
            let agent = Agent::new(config, Arc::new(llm));
            let report = workflow::run_build_error_workflow(&agent, &log_source).await?;
            println!("{}", report);
        }
        Command::Serve => {
            let agent = Agent::new(config.clone(), Arc::new(llm));
            api::serve(&config, agent).await?;
        }
    }

    Ok(())
}
