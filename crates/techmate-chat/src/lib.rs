//! Tech News & Learning Assistant built on techmate-rs.
//!
//! A chat assistant for computer science students. It answers programming
//! questions directly and searches the web (DuckDuckGo) for current news,
//! keeping the conversation in memory across questions.
//!
//! # Library usage
//!
//! ```ignore
//! use techmate_chat::{AppConfig, resolve_api_key};
//! use techmate_rs::agent::Agent;
//!
//! let config = AppConfig::default();
//! let client = config.build_client(&resolve_api_key(None)?)?;
//! let tools = config.build_tools()?;
//! let mut agent = Agent::new(&client, &tools, config.build_agent_config());
//! let answer = agent.respond("What is a closure?").await?;
//! ```
//!
//! # Binary
//!
//! ```sh
//! # Scripted three-question demo (default)
//! techmate
//!
//! # Interactive chat
//! techmate --interactive
//!
//! # Setup helpers
//! techmate --check
//! techmate --list-models
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod progress;
pub mod prompt;
pub mod repl;

pub use config::{AppConfig, resolve_api_key};
pub use error::AppError;
pub use progress::CliEventHandler;
pub use prompt::assistant_system_prompt;
