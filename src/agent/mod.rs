//! Agent module - forwards prompts to the hosted model.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user prompt
//! 2. Call the model with the available tools
//! 3. If the model requests tool calls, execute them and feed results back
//! 4. Repeat until the model produces a final response or max iterations reached
//!
//! Which tools run, how often and in what order is decided by the model.

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentResponse};
pub use prompt::{build_system_prompt, AGENT_DESCRIPTION, AGENT_NAME};
