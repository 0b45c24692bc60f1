//! Terminal progress lines for tool activity.

use techmate_rs::agent::{AgentEvent, EventHandler};
use techmate_rs::tools::names;
use techmate_rs::tools::{SearchReport, SearchStatus};

/// Prints a line to stdout whenever the agent searches, so the user can see
/// what was looked up while waiting for the answer.
pub struct CliEventHandler;

impl EventHandler for CliEventHandler {
    fn on_event(&self, event: &AgentEvent<'_>) {
        if let Some(line) = describe(event) {
            println!("{line}");
        }
    }
}

/// The progress text for an event, if it deserves one.
pub fn describe(event: &AgentEvent<'_>) -> Option<String> {
    match event {
        AgentEvent::ToolCallRequested {
            name, arguments, ..
        } if *name == names::WEB_SEARCH => {
            let query = arguments
                .get("query")
                .and_then(|q| q.as_str())
                .unwrap_or_default();
            Some(format!("\n🔍 Searching the web for: '{query}'"))
        }
        AgentEvent::ToolResult { name, payload } if *name == names::WEB_SEARCH => {
            let report = SearchReport::from_payload(payload)?;
            Some(summarize(&report))
        }
        AgentEvent::ToolFailed { name, error } => Some(format!("   ({name} failed: {error})")),
        _ => None,
    }
}

fn summarize(report: &SearchReport) -> String {
    let mut lines: Vec<String> = report
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("   {}. {}", i + 1, r.title))
        .collect();
    let count = report.records.len();
    let footer = match report.status {
        SearchStatus::Live => format!("✓ Found {count} results\n"),
        SearchStatus::Demo => format!("✓ Found {count} results (demo mode)\n"),
        SearchStatus::Empty => "   (No results found)\n".to_string(),
        SearchStatus::Unavailable => "   (Search unavailable)\n".to_string(),
    };
    if let Some(notice) = &report.notice {
        lines.insert(0, format!("   ({notice})"));
    }
    lines.push(footer);
    lines.join("\n")
}
