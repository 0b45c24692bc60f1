//! Structured system prompt builder.
//!
//! [`SystemPromptBuilder`] assembles a system prompt from a preamble and
//! `## Heading` sections, with conditional sections so callers never
//! concatenate strings by hand.

/// Builder for multi-section system prompts.
///
/// Sections are joined with blank lines. Empty sections and sections whose
/// condition is false are skipped.
///
/// # Example
///
/// ```
/// use techmate_rs::agent::prompt::SystemPromptBuilder;
///
/// let prompt = SystemPromptBuilder::new("You are a Tech News & Learning Assistant.")
///     .section("Capabilities", "- Answer programming questions")
///     .section_if(true, "Tools", || "Use web_search for recent news.".into())
///     .section_if(false, "Audience", || "hidden".into())
///     .build();
///
/// assert!(prompt.starts_with("You are a Tech News"));
/// assert!(prompt.contains("## Capabilities"));
/// assert!(prompt.contains("## Tools"));
/// assert!(!prompt.contains("## Audience"));
/// ```
#[derive(Debug, Clone)]
pub struct SystemPromptBuilder {
    sections: Vec<String>,
}

impl SystemPromptBuilder {
    /// Start with a preamble, included as-is without a heading.
    pub fn new(preamble: impl Into<String>) -> Self {
        let preamble = preamble.into();
        Self {
            sections: if preamble.is_empty() {
                vec![]
            } else {
                vec![preamble]
            },
        }
    }

    /// Append a `## heading` section. Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("## {heading}\n\n{content}"));
        }
        self
    }

    /// Append a section when `condition` holds. `content_fn` runs only then.
    pub fn section_if(
        self,
        condition: bool,
        heading: &str,
        content_fn: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            self.section(heading, content_fn())
        } else {
            self
        }
    }

    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_only() {
        assert_eq!(
            SystemPromptBuilder::new("You are an assistant.").build(),
            "You are an assistant."
        );
    }

    #[test]
    fn sections_use_heading_prefix() {
        let prompt = SystemPromptBuilder::new("Preamble")
            .section("Guidelines", "Be concise.")
            .build();
        assert_eq!(prompt, "Preamble\n\n## Guidelines\n\nBe concise.");
    }

    #[test]
    fn empty_and_disabled_sections_skipped() {
        let prompt = SystemPromptBuilder::new("P")
            .section("Empty", "")
            .section_if(false, "Tools", || "hidden".into())
            .build();
        assert_eq!(prompt, "P");
    }

    #[test]
    fn empty_preamble_leaves_no_leading_blank() {
        let prompt = SystemPromptBuilder::new("").section("A", "b").build();
        assert_eq!(prompt, "## A\n\nb");
    }
}
