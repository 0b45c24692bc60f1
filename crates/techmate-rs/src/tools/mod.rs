//! Tools the model can call.
//!
//! Every capability the model may request is a [`Tool`] implementor,
//! collected into a [`ToolRegistry`] for lookup and dispatch.
//!
//! # Defining tools
//!
//! - **[`FnTool`]**: closure-based, parses its arguments. Best for stateless tools.
//! - **`impl Tool`**: a struct with its own [`Tool::definition()`] and
//!   [`Tool::execute()`]. Best for tools holding clients or configuration,
//!   like [`WebSearch`].
//!
//! # Submodules
//!
//! - [`core`]: [`Tool`] trait, [`ToolRegistry`], [`FnTool`], argument helpers.
//! - [`spec`]: [`ToolSpec`](spec::ToolSpec) builder for structured descriptions.
//! - [`web_search`]: the `web_search` tool and its [`SearchReport`] payload.
//! - [`names`]: tool name constants.

pub mod core;
pub mod names;
pub mod spec;
pub mod web_search;

pub use core::{FnTool, Tool, ToolFuture, ToolRegistry, parse_tool_args, validate_tool_arguments};
pub use spec::ToolSpec;
pub use web_search::{FallbackPolicy, SearchReport, SearchStatus, WebSearch};
