//! Tool-using conversational agent on top of the Google Gemini API.
//!
//! `techmate-rs` owns the small amount of control flow that sits between a
//! user and a hosted model: an append-only [`Conversation`], a
//! [`ToolRegistry`](tools::core::ToolRegistry) of locally executable tools,
//! a web-search adapter, and the bounded [`Agent`](agent::Agent) loop that
//! alternates between the model and its tool requests.
//!
//! # Getting started
//!
//! ```ignore
//! use techmate_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AgentError> {
//!     let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
//!     let client = GeminiClient::new(api_key)?;
//!
//!     // Register the tools the model may call.
//!     let tools = ToolRegistry::new().with(WebSearch::new(DuckDuckGo::new()?));
//!
//!     let config = AgentConfig::new("You are a helpful tech assistant.");
//!     let mut agent = Agent::new(&client, &tools, config);
//!
//!     let answer = agent.respond("What are the latest developments in AI?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **The agent loop:** [`Agent::respond`](agent::Agent::respond) and
//!   [`AgentConfig`](agent::AgentConfig). Observe it with an
//!   [`EventHandler`](agent::events::EventHandler).
//! - **The model boundary:** the [`ModelClient`] trait, with
//!   [`GeminiClient`] as the HTTP implementation. Responses are decided once
//!   into a [`ModelResponse`].
//! - **Tools:** the [`Tool`](tools::core::Tool) trait,
//!   [`ToolRegistry`](tools::core::ToolRegistry) for lookup and dispatch, and
//!   [`WebSearch`](tools::web_search::WebSearch) for the search tool.
//! - **Search providers:** [`search::SearchProvider`] and the
//!   [`DuckDuckGo`](search::duckduckgo::DuckDuckGo) adapter.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | [`Agent`](agent::Agent) loop, config, events, system prompt builder |
//! | [`api`] | Gemini HTTP client and retry with backoff |
//! | [`conversation`] | Turns, roles, and the append-only conversation log |
//! | [`model`] | The model boundary: requests, tagged responses, tool calls and results |
//! | [`search`] | Search provider trait, records, DuckDuckGo adapter, demo content |
//! | [`tools`] | Tool trait, registry, structured tool specs, `web_search` |
//! | [`error`] | Error kinds for the model, search, and tool boundaries |

pub mod agent;
pub mod api;
pub mod conversation;
pub mod error;
pub mod model;
pub mod prelude;
pub mod search;
pub mod tools;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use api::gemini::GeminiClient;
pub use conversation::{Conversation, Role, Turn, TurnContent};
pub use error::{AgentError, ModelError, SearchError, ToolError, UnknownToolError};
pub use model::{ModelClient, ModelFuture, ModelRequest, ModelResponse, ToolCallRequest, ToolResult};

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Base URL of the Gemini REST API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for all LLM calls.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ── Schema generation ──────────────────────────────────────────────

/// Schema keywords the Gemini function-declaration format rejects.
const UNSUPPORTED_SCHEMA_KEYWORDS: &[&str] =
    &["$schema", "title", "definitions", "additionalProperties"];

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`, reduced to the OpenAPI subset that Gemini
/// function declarations accept.
///
/// Draft-07 bookkeeping (`$schema`, `title`, `definitions`) is dropped and
/// nullable type unions (`["string", "null"]`) become `type` + `nullable`.
///
/// # Example
///
/// ```
/// use techmate_rs::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct SearchArgs {
///     query: String,
///     #[serde(default)]
///     region: Option<String>,
/// }
///
/// let schema = json_schema_for::<SearchArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema.get("$schema").is_none());
/// assert!(schema["required"].as_array().unwrap().contains(&"query".into()));
/// assert_eq!(schema["properties"]["region"]["type"], "string");
/// assert_eq!(schema["properties"]["region"]["nullable"], true);
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    let mut value = serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}));
    sanitize_schema(&mut value);
    value
}

/// Strip unsupported keywords from one schema node and recurse into its
/// `properties` and `items`. Property *names* are never touched.
fn sanitize_schema(node: &mut serde_json::Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    for keyword in UNSUPPORTED_SCHEMA_KEYWORDS {
        obj.remove(*keyword);
    }

    if let Some(serde_json::Value::Array(types)) = obj.get("type").cloned() {
        let nullable = types.iter().any(|t| t == "null");
        if let Some(primary) = types.into_iter().find(|t| t != "null") {
            obj.insert("type".into(), primary);
        }
        if nullable {
            obj.insert("nullable".into(), serde_json::Value::Bool(true));
        }
    }

    if let Some(serde_json::Value::Object(props)) = obj.get_mut("properties") {
        for prop in props.values_mut() {
            sanitize_schema(prop);
        }
    }
    if let Some(items) = obj.get_mut("items") {
        sanitize_schema(items);
    }
}

// ── Tool declarations ──────────────────────────────────────────────

/// A function declaration sent to the model so it knows which tools it may
/// request and with which arguments.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct NoteArgs {
        /// Title of the note.
        title: String,
        tags: Vec<String>,
    }

    #[test]
    fn schema_keeps_property_named_title() {
        let schema = json_schema_for::<NoteArgs>();
        assert!(schema.get("title").is_none(), "root title is bookkeeping");
        assert_eq!(schema["properties"]["title"]["type"], "string");
        assert_eq!(
            schema["properties"]["title"]["description"],
            "Title of the note."
        );
    }

    #[test]
    fn schema_array_items_survive() {
        let schema = json_schema_for::<NoteArgs>();
        assert_eq!(schema["properties"]["tags"]["type"], "array");
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
    }

    #[test]
    fn tool_def_serializes_as_function_declaration() {
        let def = ToolDef::new("web_search", "Search", serde_json::json!({"type": "object"}));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["name"], "web_search");
        assert_eq!(json["description"], "Search");
        assert_eq!(json["parameters"]["type"], "object");
    }
}
