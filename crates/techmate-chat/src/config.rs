//! Application configuration.
//!
//! [`AppConfig`] holds every setting the assistant needs and turns them into
//! `techmate-rs` types: the [`GeminiClient`], the [`ToolRegistry`], and the
//! [`AgentConfig`]. The API key is passed in explicitly; nothing here reads
//! the environment except [`resolve_api_key`].

use techmate_rs::agent::{AgentConfig, DEFAULT_MAX_TOOL_ROUNDS};
use techmate_rs::search::DuckDuckGo;
use techmate_rs::tools::web_search::DEFAULT_MAX_RESULTS;
use techmate_rs::tools::{FallbackPolicy, ToolRegistry, WebSearch};
use techmate_rs::{API_KEY_ENV, DEFAULT_MODEL, GeminiClient};

use crate::error::AppError;
use crate::prompt::assistant_system_prompt;

/// Settings for one assistant session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Gemini model name. Default: `"gemini-2.5-flash"`.
    pub model: String,
    /// Maximum search results handed to the model. Default: `5`.
    pub max_results: usize,
    /// Substitute canned demo results when search is empty or unavailable.
    pub demo_fallback: bool,
    /// Send prior turns with each message. Default: `true`.
    pub memory: bool,
    /// Register the `web_search` tool. Default: `true`.
    pub tools_enabled: bool,
    /// Maximum model calls per message. Default: `5`.
    pub max_tool_rounds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            demo_fallback: false,
            memory: true,
            tools_enabled: true,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

impl AppConfig {
    pub fn build_client(&self, api_key: &str) -> Result<GeminiClient, AppError> {
        let client = GeminiClient::new(api_key).map_err(AppError::Client)?;
        Ok(client.with_model(&self.model))
    }

    /// Registry with `web_search` over DuckDuckGo, or an empty registry when
    /// tools are disabled.
    pub fn build_tools(&self) -> Result<ToolRegistry, AppError> {
        if !self.tools_enabled {
            return Ok(ToolRegistry::new());
        }
        let provider = DuckDuckGo::new().map_err(AppError::Search)?;
        let fallback = if self.demo_fallback {
            FallbackPolicy::DemoContent
        } else {
            FallbackPolicy::Notice
        };
        let search = WebSearch::new(provider)
            .with_max_results(self.max_results)
            .with_fallback(fallback);
        Ok(ToolRegistry::new().with(search))
    }

    pub fn build_agent_config(&self) -> AgentConfig {
        AgentConfig::new(assistant_system_prompt(self.tools_enabled))
            .with_max_tool_rounds(self.max_tool_rounds)
            .with_memory(self.memory)
    }
}

/// Pick the API key: an explicit value first, then `GEMINI_API_KEY`.
/// Blank values count as missing.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, AppError> {
    pick_api_key(explicit, std::env::var(API_KEY_ENV).ok())
}

fn pick_api_key(explicit: Option<String>, from_env: Option<String>) -> Result<String, AppError> {
    explicit
        .into_iter()
        .chain(from_env)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
        .ok_or(AppError::MissingApiKey { env: API_KEY_ENV })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.max_results, 5);
        assert_eq!(config.max_tool_rounds, 5);
        assert!(config.memory);
        assert!(config.tools_enabled);
        assert!(!config.demo_fallback);
    }

    #[test]
    fn build_tools_registers_web_search() {
        let tools = AppConfig::default().build_tools().unwrap();
        assert_eq!(tools.names(), ["web_search"]);
    }

    #[test]
    fn build_tools_empty_when_disabled() {
        let config = AppConfig {
            tools_enabled: false,
            ..Default::default()
        };
        assert!(config.build_tools().unwrap().is_empty());
    }

    #[test]
    fn agent_config_carries_prompt_and_memory() {
        let config = AppConfig {
            memory: false,
            max_tool_rounds: 3,
            ..Default::default()
        };
        let agent = config.build_agent_config();
        assert!(!agent.memory);
        assert_eq!(agent.max_tool_rounds, 3);
        let prompt = agent.system_prompt.unwrap();
        assert!(prompt.contains("Tech News & Learning Assistant"));
    }

    #[test]
    fn client_uses_configured_model() {
        let config = AppConfig {
            model: "models/gemini-2.0-flash".into(),
            ..Default::default()
        };
        let client = config.build_client("key").unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[test]
    fn blank_key_is_rejected_by_client() {
        let err = AppConfig::default().build_client("").unwrap_err();
        assert!(matches!(err, AppError::Client(_)));
    }

    #[test]
    fn api_key_precedence() {
        assert_eq!(
            pick_api_key(Some("flag".into()), Some("env".into())).unwrap(),
            "flag"
        );
        assert_eq!(pick_api_key(Some("  ".into()), Some("env".into())).unwrap(), "env");
        assert_eq!(pick_api_key(None, Some(" env \n".into())).unwrap(), "env");
        assert!(matches!(
            pick_api_key(None, None),
            Err(AppError::MissingApiKey { env: "GEMINI_API_KEY" })
        ));
    }
}
