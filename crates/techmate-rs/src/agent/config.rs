//! Configuration for the [`Agent`](super::Agent).
//!
//! ```ignore
//! let config = AgentConfig::new("You are a Tech News & Learning Assistant.")
//!     .with_max_tool_rounds(5)
//!     .with_memory(true);
//! ```

/// Default cap on model round-trips per [`respond`](super::Agent::respond) call.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 5;

/// Agent loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Sent as the system instruction on every request.
    pub system_prompt: Option<String>,
    /// Maximum model calls per user message, the first call included.
    /// Never below 1.
    pub max_tool_rounds: u32,
    /// Whether prior turns are sent with each message. Without memory every
    /// message is answered in isolation, though turns are still recorded.
    pub memory: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            memory: true,
        }
    }
}

impl AgentConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let prompt = system_prompt.into();
        Self {
            system_prompt: Some(prompt).filter(|p| !p.is_empty()),
            ..Default::default()
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }
}
