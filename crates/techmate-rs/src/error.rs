//! Error kinds for the three boundaries the agent talks across: the hosted
//! model, the search provider, and the local tool registry.
//!
//! Only [`ModelError`] ever escapes [`Agent::respond`](crate::agent::Agent::respond).
//! Search and tool failures are turned into payloads the model can read.

use std::time::Duration;

use thiserror::Error;

/// Failure talking to the hosted model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No API key was configured. Raised when the client is built.
    #[error("missing API key: set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, TLS, or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured model timeout.
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The API returned a structured error or refused the prompt.
    #[error("model API error: {0}")]
    Api(String),

    /// The response could not be decoded into text or a tool call.
    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl ModelError {
    /// Whether retrying the same request may succeed: rate limits, server
    /// errors, transport failures, and timeouts.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// Failure inside a search provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// The provider answered but returned no records.
    #[error("no results found for '{query}'")]
    EmptyResult { query: String },

    /// The provider rejected the request.
    #[error("search provider error: {0}")]
    Provider(String),

    /// Network failure reaching the provider.
    #[error("search transport error: {0}")]
    Transport(String),

    /// The search did not finish in time.
    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    /// The provider's response could not be parsed.
    #[error("failed to parse search results: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

/// The model asked for a tool that is not registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tool: {name}")]
pub struct UnknownToolError {
    pub name: String,
}

/// Failure executing a registered tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Unknown(#[from] UnknownToolError),

    /// Arguments did not match the tool's parameter schema.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("tool '{tool}' timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },
}

/// Error returned by [`Agent::respond`](crate::agent::Agent::respond).
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
}
