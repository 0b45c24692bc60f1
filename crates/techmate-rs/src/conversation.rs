//! The dialogue log: roles, turns, and the append-only [`Conversation`].
//!
//! Only text turns are ever recorded here. Tool calls and their results
//! live in the per-call exchange inside
//! [`Agent::respond`](crate::agent::Agent::respond) and are dropped once the
//! final answer is known.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ToolCallRequest, ToolResult};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    /// A tool result fed back to the model.
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// What a turn carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnContent {
    Text { text: String },
    ToolCall(ToolCallRequest),
    ToolResult(ToolResult),
}

/// One entry in the dialogue, tagged with its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text { text: text.into() },
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: TurnContent::Text { text: text.into() },
        }
    }

    /// A model turn requesting a tool.
    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self {
            role: Role::Model,
            content: TurnContent::ToolCall(call),
        }
    }

    pub fn tool_result(result: ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: TurnContent::ToolResult(result),
        }
    }

    /// The text of a text turn, `None` for tool traffic.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            TurnContent::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Ordered, append-only log of `user` / `model` text turns.
///
/// Turns alternate strictly, starting with `user`. The log only grows;
/// [`reset`](Self::reset) is the one way to shrink it.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Owned copy of the current turns, used as the prior history of the
    /// next request.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Discard every turn.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        debug_assert!(
            self.turns.last().is_none_or(|t| t.role == Role::Model),
            "user turn must follow a model turn"
        );
        self.turns.push(Turn::user(text));
    }

    pub(crate) fn push_model(&mut self, text: impl Into<String>) {
        debug_assert!(
            self.turns.last().is_some_and(|t| t.role == Role::User),
            "model turn must answer a user turn"
        );
        self.turns.push(Turn::model(text));
    }

    /// Remove a trailing `user` turn that never got an answer.
    pub(crate) fn withdraw_unanswered(&mut self) -> Option<Turn> {
        if self.turns.last().is_some_and(|t| t.role == Role::User) {
            self.turns.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::Tool.to_string(), "tool");
    }

    #[test]
    fn push_alternates() {
        let mut conv = Conversation::new();
        conv.push_user("hi");
        conv.push_model("hello");
        conv.push_user("again");
        conv.push_model("sure");

        let roles: Vec<Role> = conv.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, [Role::User, Role::Model, Role::User, Role::Model]);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut conv = Conversation::new();
        conv.push_user("q");
        let snap = conv.snapshot();
        conv.push_model("a");
        assert_eq!(snap.len(), 1);
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn withdraw_only_removes_trailing_user() {
        let mut conv = Conversation::new();
        conv.push_user("q");
        conv.push_model("a");
        assert!(conv.withdraw_unanswered().is_none());
        assert_eq!(conv.len(), 2);

        conv.push_user("unanswered");
        let withdrawn = conv.withdraw_unanswered().unwrap();
        assert_eq!(withdrawn.text(), Some("unanswered"));
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn reset_clears() {
        let mut conv = Conversation::new();
        conv.push_user("q");
        conv.push_model("a");
        conv.reset();
        assert!(conv.is_empty());
    }

    #[test]
    fn tool_turns_have_no_text() {
        let call = Turn::tool_call(ToolCallRequest::new("web_search", serde_json::json!({})));
        assert_eq!(call.role, Role::Model);
        assert!(call.text().is_none());

        let result = Turn::tool_result(ToolResult::new("web_search", "{}"));
        assert_eq!(result.role, Role::Tool);
    }
}
