//! Interactive chat loop.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use techmate_rs::agent::Agent;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

/// Example questions shown by `help`.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What is object-oriented programming?",
    "What's new in Python 3.13?",
    "How do I use Git branches?",
    "What are the latest AI breakthroughs?",
    "Explain recursion with an example",
];

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Clear,
    Help,
    /// Blank input.
    Skip,
    Message(String),
}

impl ReplCommand {
    /// Commands are matched case-insensitively after trimming.
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Self::Skip;
        }
        match input.to_lowercase().as_str() {
            "quit" | "exit" => Self::Quit,
            "clear" => Self::Clear,
            "help" => Self::Help,
            _ => Self::Message(input.to_string()),
        }
    }
}

pub fn write_banner(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Tech News & Learning Assistant - Interactive Demo")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "\nCommands:")?;
    writeln!(out, "  - Type 'quit' or 'exit' to end")?;
    writeln!(out, "  - Type 'clear' to clear conversation history")?;
    writeln!(out, "  - Type 'help' to see example questions")?;
    writeln!(out, "\n{RULE}\n")
}

pub fn write_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "\nExample questions to try:")?;
    for question in EXAMPLE_QUESTIONS {
        writeln!(out, "  - {question}")?;
    }
    writeln!(out)
}

/// Run the REPL until `quit`/`exit` or end of input.
///
/// A failed model call is reported and the loop continues; the failed
/// message is not kept in the conversation.
pub async fn run_interactive<R, W>(
    agent: &mut Agent<'_>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write_banner(out)?;
    let mut lines = input.lines();

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Skip => continue,
            ReplCommand::Quit => {
                writeln!(out, "\nGoodbye! 👋\n")?;
                break;
            }
            ReplCommand::Clear => {
                agent.reset();
                writeln!(out, "✓ Conversation history cleared\n")?;
            }
            ReplCommand::Help => write_help(out)?,
            ReplCommand::Message(message) => {
                writeln!(out)?;
                match agent.respond(&message).await {
                    Ok(answer) => writeln!(out, "Agent: {answer}\n")?,
                    Err(e) => {
                        warn!("respond failed: {e}");
                        writeln!(out, "Error: {e}\n")?;
                    }
                }
                writeln!(out, "{THIN_RULE}\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use techmate_rs::agent::AgentConfig;
    use techmate_rs::error::ModelError;
    use techmate_rs::model::{ModelClient, ModelFuture, ModelRequest, ModelResponse};
    use techmate_rs::tools::ToolRegistry;

    struct CannedModel {
        replies: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    }

    impl CannedModel {
        fn new(replies: Vec<Result<ModelResponse, ModelError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    impl ModelClient for CannedModel {
        fn generate<'a>(&'a self, _request: &'a ModelRequest) -> ModelFuture<'a> {
            let next = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ModelResponse::Text("...".into())));
            Box::pin(async move { next })
        }
    }

    #[test]
    fn parse_commands() {
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("  EXIT "), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("Clear"), ReplCommand::Clear);
        assert_eq!(ReplCommand::parse("HELP"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Skip);
        assert_eq!(
            ReplCommand::parse(" What is Rust? "),
            ReplCommand::Message("What is Rust?".into())
        );
        assert_eq!(
            ReplCommand::parse("quit now"),
            ReplCommand::Message("quit now".into())
        );
    }

    #[test]
    fn help_lists_examples() {
        let mut out = Vec::new();
        write_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for question in EXAMPLE_QUESTIONS {
            assert!(text.contains(question));
        }
    }

    #[tokio::test]
    async fn session_answers_clears_and_quits() {
        let model = CannedModel::new(vec![
            Ok(ModelResponse::Text("Recursion is a function calling itself.".into())),
            Ok(ModelResponse::Text("Fresh start.".into())),
        ]);
        let tools = ToolRegistry::new();
        let mut agent = Agent::new(&model, &tools, AgentConfig::default());

        let input: &[u8] = b"\nExplain recursion\nclear\nhello\nhelp\nQUIT\nnever read\n";
        let mut out = Vec::new();
        run_interactive(&mut agent, input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Agent: Recursion is a function calling itself."));
        assert!(text.contains("Conversation history cleared"));
        assert!(text.contains("Agent: Fresh start."));
        assert!(text.contains("Example questions to try"));
        assert!(text.contains("Goodbye!"));
        // Only the exchange after `clear` remains.
        assert_eq!(agent.conversation().len(), 2);
        assert_eq!(agent.conversation().turns()[0].text(), Some("hello"));
    }

    #[tokio::test]
    async fn model_error_is_reported_and_loop_continues() {
        let model = CannedModel::new(vec![
            Err(ModelError::Timeout(std::time::Duration::from_secs(1))),
            Ok(ModelResponse::Text("ok".into())),
        ]);
        let tools = ToolRegistry::new();
        let mut agent = Agent::new(&model, &tools, AgentConfig::default());

        let input: &[u8] = b"first\nsecond\n";
        let mut out = Vec::new();
        run_interactive(&mut agent, input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error:"));
        assert!(text.contains("Agent: ok"));
        assert_eq!(agent.conversation().len(), 2);
    }
}
