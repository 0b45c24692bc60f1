//! The bounded tool-use loop.
//!
//! [`Agent::respond`] sends a user message to the model together with the
//! prior history and the registry's tool declarations, runs any tool the
//! model asks for, and feeds the result back, until the model answers in
//! text or the round cap is reached. Tool traffic lives only in the
//! per-call exchange; the [`Conversation`] records just the user message and
//! the final answer.

use tracing::debug;

use super::config::AgentConfig;
use super::events::{AgentEvent, EventHandler, NoopHandler};
use crate::conversation::{Conversation, Turn};
use crate::error::AgentError;
use crate::model::{ModelClient, ModelRequest, ModelResponse, ToolResult};
use crate::tools::core::ToolRegistry;

/// A conversational agent bound to one model client and one tool registry.
///
/// `respond` takes `&mut self`, so one agent serves one conversation at a
/// time. Separate conversations need separate agents.
pub struct Agent<'a> {
    client: &'a dyn ModelClient,
    tools: &'a ToolRegistry,
    config: AgentConfig,
    conversation: Conversation,
    event_handler: &'a dyn EventHandler,
}

impl<'a> Agent<'a> {
    pub fn new(client: &'a dyn ModelClient, tools: &'a ToolRegistry, config: AgentConfig) -> Self {
        Self {
            client,
            tools,
            config,
            conversation: Conversation::new(),
            event_handler: &NoopHandler,
        }
    }

    pub fn with_event_handler(mut self, handler: &'a dyn EventHandler) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Discard every recorded turn.
    pub fn reset(&mut self) {
        let discarded = self.conversation.len();
        self.conversation.reset();
        self.event_handler
            .on_event(&AgentEvent::ConversationReset { discarded });
    }

    /// Answer one user message.
    ///
    /// On success the conversation gains exactly two turns: the message and
    /// the answer. A model failure leaves the conversation as it was.
    pub async fn respond(&mut self, user_message: &str) -> Result<String, AgentError> {
        let history = if self.config.memory {
            self.conversation.snapshot()
        } else {
            Vec::new()
        };
        self.conversation.push_user(user_message);
        self.event_handler.on_event(&AgentEvent::ExchangeStarted {
            message: user_message,
            history_turns: history.len(),
        });

        let mut request = ModelRequest::new(user_message)
            .with_system_prompt(self.config.system_prompt.clone())
            .with_history(history)
            .with_tools(self.tools.definitions());

        let max_rounds = self.config.max_tool_rounds.max(1);
        let mut round = 0;
        let mut tool_calls = 0;

        let answer = loop {
            round += 1;
            self.event_handler
                .on_event(&AgentEvent::ModelRequest { round, max_rounds });

            let response = match self.client.generate(&request).await {
                Ok(r) => r,
                Err(error) => {
                    self.event_handler
                        .on_event(&AgentEvent::ModelFailed { error: &error });
                    self.conversation.withdraw_unanswered();
                    return Err(error.into());
                }
            };

            if !response.text().is_empty() {
                self.event_handler
                    .on_event(&AgentEvent::Text(response.text()));
            }

            let (call, text) = match response {
                ModelResponse::Text(text) => break text,
                ModelResponse::ToolCall { call, text } => (call, text),
            };

            self.event_handler.on_event(&AgentEvent::ToolCallRequested {
                round,
                name: &call.name,
                arguments: &call.arguments,
            });

            let tool = match self.tools.resolve(&call.name) {
                Ok(tool) => tool,
                Err(unknown) => {
                    self.event_handler
                        .on_event(&AgentEvent::UnknownTool { name: &unknown.name });
                    break text;
                }
            };

            if round >= max_rounds {
                self.event_handler
                    .on_event(&AgentEvent::RoundLimitReached { max_rounds });
                break text;
            }

            let result = match self.tools.invoke(tool, &call.arguments).await {
                Ok(result) => {
                    self.event_handler.on_event(&AgentEvent::ToolResult {
                        name: &result.name,
                        payload: &result.payload,
                    });
                    result
                }
                Err(error) => {
                    self.event_handler.on_event(&AgentEvent::ToolFailed {
                        name: &call.name,
                        error: &error,
                    });
                    ToolResult::error(call.name.clone(), &error)
                }
            };
            tool_calls += 1;

            request.exchange.push(Turn::tool_call(call));
            request.exchange.push(Turn::tool_result(result));
        };

        debug!(
            "Exchange done: {round} round(s), {tool_calls} tool call(s), {} chars",
            answer.len()
        );
        self.conversation.push_model(answer.clone());
        self.event_handler
            .on_event(&AgentEvent::Finished { rounds: round, tool_calls });
        Ok(answer)
    }
}
