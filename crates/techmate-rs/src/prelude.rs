//! Convenience re-exports for common `techmate-rs` types.
//!
//! ```ignore
//! use techmate_rs::prelude::*;
//! ```
//!
//! Covers what a typical front end needs: the [`GeminiClient`], the
//! [`Agent`] and its config, event handlers, and the tool registry with the
//! web search tool. Wire types and parsers stay in their modules.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{
    Conversation, GeminiClient, ModelClient, ModelRequest, ModelResponse, Role, ToolDef, Turn,
    json_schema_for,
};

// ── Errors ──────────────────────────────────────────────────────────
pub use crate::error::{AgentError, ModelError, SearchError, ToolError};

// ── Agent runtime ───────────────────────────────────────────────────
pub use crate::agent::{
    Agent, AgentConfig, AgentEvent, CompositeEventHandler, EventHandler, FnEventHandler,
    LoggingHandler, NoopHandler, SystemPromptBuilder,
};

// ── Tools and search ────────────────────────────────────────────────
pub use crate::search::{DuckDuckGo, SearchProvider, SearchRecord};
pub use crate::tools::spec::ToolSpec;
pub use crate::tools::{
    FallbackPolicy, FnTool, SearchReport, SearchStatus, Tool, ToolFuture, ToolRegistry, WebSearch,
    parse_tool_args,
};
