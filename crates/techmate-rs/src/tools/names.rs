//! Tool name constants.

pub const WEB_SEARCH: &str = "web_search";
