//! Fixed demo records.
//!
//! Used only under [`FallbackPolicy::DemoContent`](crate::tools::web_search::FallbackPolicy),
//! and always reported with status `demo`.

use super::SearchRecord;

/// Substituted when a search comes back empty.
pub fn ai_news() -> Vec<SearchRecord> {
    vec![
        SearchRecord::new(
            "Latest AI Developments: Google DeepMind Announces Breakthrough",
            "Google DeepMind has announced significant advances in large language models, \
             improving reasoning capabilities by 40% and reducing hallucinations through a \
             new technique called 'grounded generation'.",
            "https://example.com/ai-news-1",
        ),
        SearchRecord::new(
            "OpenAI Releases GPT-5 with Enhanced Multimodal Capabilities",
            "OpenAI's latest model shows remarkable improvements in code generation and \
             mathematical reasoning. The model can now process video input in real-time and \
             generate more accurate responses.",
            "https://example.com/ai-news-2",
        ),
        SearchRecord::new(
            "New Study Shows AI Models Improving in Scientific Research",
            "Researchers demonstrate that modern LLMs can assist in drug discovery and \
             materials science, cutting research time by up to 60% in initial hypothesis \
             generation.",
            "https://example.com/ai-news-3",
        ),
    ]
}

/// Substituted when the provider fails.
pub fn tech_news() -> Vec<SearchRecord> {
    vec![
        SearchRecord::new(
            "Tech News: Latest Programming Trends",
            "Python continues to dominate in data science and AI development. New frameworks \
             are making AI development more accessible to developers.",
            "https://example.com/tech-news-1",
        ),
        SearchRecord::new(
            "AI Research Breakthroughs in 2025",
            "Major advancements in natural language processing and computer vision are \
             transforming how we interact with technology.",
            "https://example.com/tech-news-2",
        ),
        SearchRecord::new(
            "GitHub Copilot and AI Coding Assistants on the Rise",
            "AI-powered coding tools are becoming essential for developers, with studies \
             showing 30% improvement in coding speed.",
            "https://example.com/tech-news-3",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_sets_have_three_distinct_records() {
        for set in [ai_news(), tech_news()] {
            assert_eq!(set.len(), 3);
            assert!(set.iter().all(|r| r.url.starts_with("https://example.com/")));
        }
        assert_ne!(ai_news()[0].url, tech_news()[0].url);
    }
}
