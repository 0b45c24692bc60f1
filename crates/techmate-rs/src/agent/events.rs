//! Events and handlers for the [`Agent`](super::Agent) loop.
//!
//! The agent reports every step of [`respond`](super::Agent::respond)
//! through [`AgentEvent`] variants: model rounds, tool calls, tool results,
//! and how the exchange ended. Callers implement [`EventHandler`] to observe
//! them for logging, progress output, or test assertions.
//!
//! # Choosing an event handler
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or fire-and-forget runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |
//! | [`CompositeEventHandler`] | Compose multiple handlers in order |
//! | Custom `impl EventHandler` | Full control (CLI progress, metrics) |

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ModelError, ToolError};

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the agent while answering one message.
#[derive(Debug)]
pub enum AgentEvent<'a> {
    /// A user message was accepted. `history_turns` is the number of prior
    /// turns that will be sent with it.
    ExchangeStarted {
        message: &'a str,
        history_turns: usize,
    },
    /// The model is about to be called.
    ModelRequest { round: u32, max_rounds: u32 },
    /// The model returned text (possibly alongside a tool call).
    Text(&'a str),
    /// The model asked for a tool.
    ToolCallRequested {
        round: u32,
        name: &'a str,
        arguments: &'a Value,
    },
    /// A tool finished and its payload is going back to the model.
    ToolResult { name: &'a str, payload: &'a str },
    /// A tool failed; the error is reported back to the model.
    ToolFailed { name: &'a str, error: &'a ToolError },
    /// The model asked for a tool that is not registered. The exchange ends.
    UnknownTool { name: &'a str },
    /// The round cap was hit while the model still wanted tools.
    RoundLimitReached { max_rounds: u32 },
    /// The model call failed and the exchange was abandoned.
    ModelFailed { error: &'a ModelError },
    /// A final answer was recorded.
    Finished { rounds: u32, tool_calls: u32 },
    /// The conversation was cleared.
    ConversationReset { discarded: usize },
}

/// Handler for agent events.
///
/// # Example
///
/// ```ignore
/// struct Progress;
///
/// impl EventHandler for Progress {
///     fn on_event(&self, event: &AgentEvent<'_>) {
///         if let AgentEvent::ToolCallRequested { name, .. } = event {
///             eprintln!("calling {name}...");
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &AgentEvent<'_>) {
        let _ = event;
    }
}

/// A handler that ignores every event.
pub struct NoopHandler;
impl EventHandler for NoopHandler {}

/// An event handler backed by a closure.
///
/// ```ignore
/// let handler = FnEventHandler::new(|event| {
///     if let AgentEvent::Text(text) = event {
///         println!("{text}");
///     }
/// });
/// ```
pub struct FnEventHandler<F>(F)
where
    F: Fn(&AgentEvent<'_>) + Send + Sync;

impl<F> FnEventHandler<F>
where
    F: Fn(&AgentEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(&AgentEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &AgentEvent<'_>) {
        (self.0)(event)
    }
}

/// Dispatches each event to several handlers, in registration order.
///
/// ```ignore
/// let handler = CompositeEventHandler::new()
///     .with(LoggingHandler)
///     .with_if(show_progress, CliEventHandler);
/// ```
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn with(mut self, handler: impl EventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn with_if(self, condition: bool, handler: impl EventHandler + 'static) -> Self {
        if condition { self.with(handler) } else { self }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CompositeEventHandler {
    fn on_event(&self, event: &AgentEvent<'_>) {
        for handler in &self.handlers {
            handler.on_event(event);
        }
    }
}

/// An event handler that logs events via `tracing`.
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &AgentEvent<'_>) {
        match event {
            AgentEvent::ExchangeStarted {
                message,
                history_turns,
            } => {
                let preview: String = message.chars().take(80).collect();
                debug!("User message ({history_turns} prior turn(s)): {preview}");
            }
            AgentEvent::ModelRequest { round, max_rounds } => {
                debug!("[round {round}/{max_rounds}] calling model");
            }
            AgentEvent::Text(text) => {
                let preview: String = text.chars().take(200).collect();
                debug!(
                    "LLM text: {preview}{}",
                    if text.chars().count() > 200 { "..." } else { "" }
                );
            }
            AgentEvent::ToolCallRequested { round, name, .. } => {
                debug!("Round {round}: model requested tool {name}");
            }
            AgentEvent::ToolResult { name, payload } => {
                debug!("Tool {name} result: {} bytes", payload.len());
            }
            AgentEvent::ToolFailed { name, error } => {
                warn!("Tool {name} failed: {error}");
            }
            AgentEvent::UnknownTool { name } => {
                warn!("Model requested unknown tool '{name}'; ending exchange");
            }
            AgentEvent::RoundLimitReached { max_rounds } => {
                info!("Agent hit round limit ({max_rounds})");
            }
            AgentEvent::ModelFailed { error } => {
                warn!("Model call failed: {error}");
            }
            AgentEvent::Finished { rounds, tool_calls } => {
                info!("Answer ready after {rounds} round(s), {tool_calls} tool call(s)");
            }
            AgentEvent::ConversationReset { discarded } => {
                info!("Conversation cleared ({discarded} turn(s) discarded)");
            }
        }
    }
}
