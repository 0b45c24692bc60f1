//! Scripted three-question walkthrough: a concept question, a news question
//! that should trigger a search, and a follow-up that needs memory.

use std::io::Write;

use techmate_rs::agent::Agent;
use techmate_rs::error::AgentError;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "----------------------------------------";

/// One scripted step.
#[derive(Debug, Clone, Copy)]
pub struct DemoStep {
    pub title: &'static str,
    pub question: &'static str,
}

pub const DEMO_STEPS: [DemoStep; 3] = [
    DemoStep {
        title: "Programming Question",
        question: "What is the difference between a list and a tuple in Python?",
    },
    DemoStep {
        title: "Current Tech News",
        question: "What are the latest developments in large language models?",
    },
    DemoStep {
        title: "Conversation Memory",
        question: "Can you explain the first concept you mentioned in more detail?",
    },
];

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ask every [`DEMO_STEPS`] question in order on one conversation.
/// Stops at the first model failure.
pub async fn run_scripted(agent: &mut Agent<'_>, out: &mut impl Write) -> Result<(), DemoError> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Tech News & Learning Assistant - Scripted Demo")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "\nThis demo shows:")?;
    writeln!(out, "1. Answering a programming question (no search)")?;
    writeln!(out, "2. Searching for current tech news (uses web search)")?;
    writeln!(out, "3. Using conversation memory (remembers context)")?;
    writeln!(out, "\n{RULE}\n")?;

    for (i, step) in DEMO_STEPS.iter().enumerate() {
        writeln!(out, "DEMO {}: {}", i + 1, step.title)?;
        writeln!(out, "{THIN_RULE}")?;
        writeln!(out, "You: {}\n", step.question)?;
        out.flush()?;

        let answer = agent.respond(step.question).await?;
        writeln!(out, "Agent: {answer}\n")?;
        writeln!(out, "{RULE}\n")?;
    }
    Ok(())
}
