//! System prompt for the Tech News & Learning Assistant.

use techmate_rs::agent::SystemPromptBuilder;
use techmate_rs::tools::names;

const PREAMBLE: &str = "You are a Tech News & Learning Assistant for computer science students.";

const CAPABILITIES: &str = "\
- Answer programming and CS concept questions clearly
- Search the web for current tech news, tutorials, and documentation
- Provide code examples when helpful
- Remember the conversation context";

const GUIDELINES: &str = "\
- Be friendly and encouraging
- Keep explanations clear and concise
- Provide practical, actionable advice";

/// Build the assistant's system prompt.
///
/// The search guidance is only included when the `web_search` tool is
/// actually registered.
pub fn assistant_system_prompt(tools_enabled: bool) -> String {
    SystemPromptBuilder::new(PREAMBLE)
        .section("Your capabilities", CAPABILITIES)
        .section("Guidelines", GUIDELINES)
        .section_if(tools_enabled, "Web search", || {
            format!(
                "Use {} when you need current information or recent news. \
                 If a search result carries a notice, tell the user the results \
                 may be incomplete or illustrative.",
                names::WEB_SEARCH
            )
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_assistant() {
        let prompt = assistant_system_prompt(true);
        assert!(prompt.starts_with("You are a Tech News & Learning Assistant"));
        assert!(prompt.contains("## Guidelines"));
        assert!(prompt.contains("web_search"));
    }

    #[test]
    fn search_guidance_only_with_tools() {
        let prompt = assistant_system_prompt(false);
        assert!(prompt.contains("## Your capabilities"));
        assert!(!prompt.contains("## Web search"));
    }
}
