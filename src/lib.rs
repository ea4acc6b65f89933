//! # build-triage
//!
//! An agent that triages failed builds: it reads the build log, finds the
//! file that broke the build, looks up who last modified it and emails them.
//!
//! This library provides:
//! - Three tools (log retrieval, last-modifier lookup, email notification)
//! - A tool-calling agent backed by a hosted Gemini model
//! - A CLI and a small HTTP API around the workflow
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a log source
//! 2. Build context with system prompt and available tools
//! 3. Call the model, execute any tool calls it requests
//! 4. Feed results back to the model, repeat until it answers
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use build_triage::{agent::Agent, config::Config, llm::GeminiClient, workflow};
//!
//! let config = Config::from_env()?;
//! let llm = GeminiClient::new(&config.api_key, &config.base_url, config.request_timeout_secs)?;
//! let agent = Agent::new(config, Arc::new(llm));
//! let report = workflow::run_build_error_workflow(&agent, "build.log").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;
pub mod workflow;

pub use config::Config;
