//! The model boundary.
//!
//! [`ModelClient`] is the seam between the agent loop and a hosted model.
//! A request carries everything the model needs for one round; the response
//! is decided once, at the client, into a [`ModelResponse`] so the loop
//! never has to inspect raw API payloads.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::ToolDef;
use crate::conversation::Turn;
use crate::error::ModelError;

/// Boxed future returned by [`ModelClient::generate`].
pub type ModelFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ModelResponse, ModelError>> + Send + 'a>>;

/// A hosted model that can answer a [`ModelRequest`].
///
/// Uses a boxed future so the trait stays dyn-compatible; the agent holds a
/// `&dyn ModelClient`.
pub trait ModelClient: Send + Sync {
    fn generate<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a>;
}

// ── Request ────────────────────────────────────────────────────────

/// Everything sent to the model for one round.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system_prompt: Option<String>,
    /// Prior text turns, snapshotted before the current user message.
    pub history: Vec<Turn>,
    /// The user message being answered.
    pub message: String,
    /// Tool calls and results produced so far while answering `message`.
    pub exchange: Vec<Turn>,
    /// Tool declarations. Empty means the model cannot request tools.
    pub tools: Vec<ToolDef>,
}

impl ModelRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDef>) -> Self {
        self.tools = tools;
        self
    }

    /// All turns in wire order: history, the user message, then the exchange.
    pub fn turns(&self) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.history.len() + 1 + self.exchange.len());
        turns.extend(self.history.iter().cloned());
        turns.push(Turn::user(self.message.clone()));
        turns.extend(self.exchange.iter().cloned());
        turns
    }
}

// ── Response ───────────────────────────────────────────────────────

/// The model's answer for one round.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// A final text answer.
    Text(String),
    /// A request to run a tool. `text` is whatever prose accompanied the
    /// call and may be empty.
    ToolCall { call: ToolCallRequest, text: String },
}

impl ModelResponse {
    /// The text carried by this response (possibly empty).
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::ToolCall { text, .. } => text,
        }
    }

    pub fn tool_call(&self) -> Option<&ToolCallRequest> {
        match self {
            Self::ToolCall { call, .. } => Some(call),
            Self::Text(_) => None,
        }
    }
}

/// A model's request to execute a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    /// JSON object of arguments.
    pub arguments: serde_json::Value,
    /// Opaque thought signature Gemini attaches to function calls. Echoed
    /// back unchanged when the call is replayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.signature = signature;
        self
    }
}

/// Output of a tool, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    /// Serialized JSON payload.
    pub payload: String,
}

impl ToolResult {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// An error payload the model can read and react to.
    pub fn error(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        let payload = serde_json::json!({ "error": message.to_string() });
        Self::new(name, payload.to_string())
    }

    /// Whether this is an error payload produced by [`ToolResult::error`].
    pub fn is_error(&self) -> bool {
        serde_json::from_str::<serde_json::Value>(&self.payload)
            .ok()
            .and_then(|v| v.get("error").map(|e| e.is_string()))
            .unwrap_or(false)
    }

    /// The payload as JSON. Non-JSON payloads are wrapped as a string.
    pub fn payload_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.payload)
            .unwrap_or_else(|_| serde_json::Value::String(self.payload.clone()))
    }
}
