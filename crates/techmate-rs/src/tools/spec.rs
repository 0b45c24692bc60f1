//! Structured tool descriptions with usage guidance.
//!
//! [`ToolSpec`] assembles a function declaration's description from its
//! parts: purpose, when (not) to use it, examples, and the shape of its
//! output. The model reads all of it when deciding whether to call.

use crate::ToolDef;

/// A structured tool specification.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name, unique within a registry.
    pub name: String,
    /// One-sentence imperative purpose: "Search the web for current information".
    pub purpose: String,
    pub when_to_use: Option<String>,
    /// Steers the model away from calls it does not need.
    pub when_not_to_use: Option<String>,
    /// JSON Schema of the arguments.
    pub parameters: serde_json::Value,
    pub examples: Vec<UsageExample>,
    pub output_format: Option<String>,
}

/// A usage example for a tool.
#[derive(Debug, Clone)]
pub struct UsageExample {
    pub input: String,
    pub output: String,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            purpose: String::new(),
            when_to_use: None,
            when_not_to_use: None,
            parameters: None,
            examples: Vec::new(),
            output_format: None,
        }
    }

    /// Render the description string sent to the model.
    pub fn to_description(&self) -> String {
        let mut desc = self.purpose.trim_end_matches('.').to_string();
        desc.push('.');
        if let Some(when) = &self.when_to_use {
            desc.push_str(&format!("\nWhen to use: {when}"));
        }
        if let Some(when_not) = &self.when_not_to_use {
            desc.push_str(&format!("\nWhen NOT to use: {when_not}"));
        }
        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for ex in &self.examples {
                desc.push_str(&format!("\n  - Input: {} -> {}", ex.input, ex.output));
            }
        }
        if let Some(format) = &self.output_format {
            desc.push_str(&format!("\nOutput format: {format}"));
        }
        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

/// Builder for [`ToolSpec`]. Parameters default to an empty object schema.
pub struct ToolSpecBuilder {
    name: String,
    purpose: String,
    when_to_use: Option<String>,
    when_not_to_use: Option<String>,
    parameters: Option<serde_json::Value>,
    examples: Vec<UsageExample>,
    output_format: Option<String>,
}

impl ToolSpecBuilder {
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.when_to_use = Some(when.into());
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.when_not_to_use = Some(when_not.into());
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.parameters = Some(params);
        self
    }

    /// Derive the parameter schema from the argument type, so schema and
    /// deserialization cannot drift apart.
    pub fn parameters_for<T: schemars::JsonSchema>(self) -> Self {
        self.parameters(crate::json_schema_for::<T>())
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.examples.push(UsageExample {
            input: input.into(),
            output: output.into(),
        });
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.build().to_tool_def()
    }

    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            purpose: self.purpose,
            when_to_use: self.when_to_use,
            when_not_to_use: self.when_not_to_use,
            parameters: self
                .parameters
                .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}})),
            examples: self.examples,
            output_format: self.output_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_includes_guidance() {
        let spec = ToolSpec::builder("web_search")
            .purpose("Search the web for current information")
            .when_to_use("Recent news or releases")
            .when_not_to_use("Stable concepts like what a variable is")
            .example(r#"web_search(query="rust 2024 edition")"#, "Up to 5 results")
            .output_format("JSON report")
            .build();

        let desc = spec.to_description();
        assert!(desc.starts_with("Search the web for current information."));
        assert!(desc.contains("When NOT to use: Stable concepts"));
        assert!(desc.contains("Input: web_search"));
        assert!(desc.ends_with("Output format: JSON report"));
    }

    #[test]
    fn optional_sections_omitted() {
        let def = ToolSpec::builder("ping").purpose("Ping.").to_tool_def();
        assert_eq!(def.description, "Ping.");
        assert_eq!(def.parameters["type"], "object");
    }
}
