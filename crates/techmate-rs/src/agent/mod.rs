//! Agent runtime: the bounded tool-use loop and its supporting pieces.
//!
//! - [`Agent`]: owns a [`Conversation`](crate::Conversation) and answers
//!   user messages with [`Agent::respond`]. Start here.
//! - [`config::AgentConfig`]: system prompt, round cap, memory toggle.
//! - [`events`]: [`EventHandler`] trait and [`AgentEvent`] enum for
//!   observing the loop, with [`LoggingHandler`], [`FnEventHandler`], and
//!   [`CompositeEventHandler`].
//! - [`prompt`]: [`SystemPromptBuilder`] for multi-section prompt assembly.

pub mod agent_loop;
pub mod config;
pub mod events;
pub mod prompt;

pub use agent_loop::Agent;
pub use config::{AgentConfig, DEFAULT_MAX_TOOL_ROUNDS};
pub use events::{
    AgentEvent, CompositeEventHandler, EventHandler, FnEventHandler, LoggingHandler, NoopHandler,
};
pub use prompt::SystemPromptBuilder;
