//! Tool abstraction for function-calling agents.
//!
//! The [`Tool`] trait defines the interface that every tool must implement:
//! a static declaration (name, description, JSON schema) and an async
//! `execute` method. Tools are collected into a [`ToolRegistry`] which
//! resolves names, validates arguments, and enforces timeouts.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, trace};

use crate::ToolDef;
use crate::error::{ToolError, UnknownToolError};
use crate::model::ToolResult;

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolResult, ToolError>> + Send + 'a>>;

// ── Tool trait ─────────────────────────────────────────────────────

/// A tool the model can invoke via function-calling.
///
/// Implementors provide a [`ToolDef`] describing the tool and an async
/// [`Tool::execute`] that receives the call's JSON arguments.
///
/// # Example
///
/// ```ignore
/// struct Clock;
///
/// impl Tool for Clock {
///     fn definition(&self) -> ToolDef {
///         ToolSpec::builder("clock").purpose("Report the current time").to_tool_def()
///     }
///
///     fn execute<'a>(&'a self, _arguments: &'a serde_json::Value) -> ToolFuture<'a> {
///         Box::pin(async { Ok(ToolResult::new("clock", r#"{"time":"12:00"}"#)) })
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The declaration sent to the model.
    fn definition(&self) -> ToolDef;

    /// Execute the tool with the call's arguments (a JSON object).
    ///
    /// Errors are reported back to the model as an error payload by the
    /// agent; they never abort the conversation.
    fn execute<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a>;

    /// The tool's name (delegates to the definition).
    fn name(&self) -> String {
        self.definition().name
    }

    /// Per-tool timeout. Overrides the registry default when set.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

// ── ToolRegistry ───────────────────────────────────────────────────

/// Static name → tool map, populated at startup and read-only once handed
/// to an [`Agent`](crate::agent::Agent).
///
/// # Example
///
/// ```ignore
/// let tools = ToolRegistry::new()
///     .with_arg_validation(true)
///     .with_default_timeout(Some(Duration::from_secs(30)))
///     .with_if(search_enabled, WebSearch::new(DuckDuckGo::new()?));
///
/// let defs = tools.definitions();
/// ```
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
    /// Whether to validate arguments against the declared schema first.
    validate_args: bool,
    /// Default execution timeout. `None` disables it.
    default_timeout: Option<Duration>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("validate_args", &self.validate_args)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            validate_args: true,
            default_timeout: None,
        }
    }

    /// Toggle JSON Schema argument validation (on by default).
    pub fn with_arg_validation(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    /// Register a tool (builder pattern).
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Register a tool only when `condition` holds, keeping the builder
    /// chain intact.
    pub fn with_if(self, condition: bool, tool: impl Tool + 'static) -> Self {
        if condition { self.with(tool) } else { self }
    }

    /// Declarations for the model, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&dyn Tool, UnknownToolError> {
        self.tools
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| UnknownToolError {
                name: name.to_string(),
            })
    }

    /// Resolve and run a tool by name.
    pub async fn execute(&self, name: &str, arguments: &Value) -> Result<ToolResult, ToolError> {
        let tool = self.resolve(name)?;
        self.invoke(tool, arguments).await
    }

    /// Run an already-resolved tool with validation, timing, and timeout.
    pub async fn invoke(&self, tool: &dyn Tool, arguments: &Value) -> Result<ToolResult, ToolError> {
        let name = tool.name();
        if self.validate_args {
            validate_tool_arguments(tool, arguments)?;
        }

        log_tool_call(&name, arguments);
        let start = Instant::now();

        let result = match tool.timeout().or(self.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, tool.execute(arguments)).await {
                Ok(r) => r,
                Err(_) => {
                    info!(
                        "Tool {name} timed out after {:.1}s (limit: {:.0}s)",
                        start.elapsed().as_secs_f64(),
                        limit.as_secs_f64(),
                    );
                    Err(ToolError::Timeout {
                        tool: name.clone(),
                        timeout: limit,
                    })
                }
            },
            None => tool.execute(arguments).await,
        };

        match &result {
            Ok(r) => {
                debug!(
                    "Tool {name} completed in {:.0}ms ({} bytes)",
                    start.elapsed().as_secs_f64() * 1000.0,
                    r.payload.len()
                );
                trace!(
                    "Tool {name} result preview: {}",
                    r.payload.chars().take(300).collect::<String>()
                );
            }
            Err(e) => debug!("Tool {name} failed: {e}"),
        }
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── FnTool ────────────────────────────────────────────────────────

/// Type-erased async handler for [`FnTool`].
type ErasedToolHandler = Box<
    dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>>
        + Send
        + Sync,
>;

/// A closure-based tool that parses its arguments and delegates to a
/// handler returning the JSON payload.
///
/// For tools with state (HTTP clients, providers) implement [`Tool`]
/// directly.
///
/// # Example
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// struct EchoArgs { text: String }
///
/// let tool = FnTool::new(
///     ToolDef::new("echo", "Echo the input", json_schema_for::<EchoArgs>()),
///     |args: EchoArgs| async move { Ok(serde_json::json!({"echo": args.text}).to_string()) },
/// );
/// ```
pub struct FnTool {
    def: ToolDef,
    handler: ErasedToolHandler,
}

impl FnTool {
    pub fn new<A, F, Fut>(def: ToolDef, handler: F) -> Self
    where
        A: serde::de::DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let tool_name = def.name.clone();
        let erased = move |raw: Value| -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>> {
            match parse_tool_args::<A>(&tool_name, &raw) {
                Ok(args) => Box::pin(handler(args)),
                Err(e) => Box::pin(async move { Err(e) }),
            }
        };
        Self {
            def,
            handler: Box::new(erased),
        }
    }
}

impl Tool for FnTool {
    fn definition(&self) -> ToolDef {
        self.def.clone()
    }

    fn execute<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a> {
        let fut = (self.handler)(arguments.clone());
        Box::pin(async move {
            let payload = fut.await?;
            Ok(ToolResult::new(self.def.name.clone(), payload))
        })
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.def.name)
            .finish()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Validate arguments against the tool's declared JSON Schema.
///
/// `nullable` properties accept `null`. A schema that fails to compile
/// skips validation.
pub fn validate_tool_arguments(tool: &dyn Tool, arguments: &Value) -> Result<(), ToolError> {
    let def = tool.definition();
    let schema = with_null_types(&def.parameters);
    let Ok(validator) = jsonschema::validator_for(&schema) else {
        return Ok(());
    };

    let errors: Vec<String> = validator
        .iter_errors(arguments)
        .map(|e| format!("{}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments {
            tool: def.name,
            message: errors.join("; "),
        })
    }
}

/// Turn `type` + `nullable: true` back into a `[type, "null"]` union, which
/// is the form JSON Schema validators understand.
fn with_null_types(schema: &Value) -> Value {
    let mut schema = schema.clone();
    restore_null_types(&mut schema);
    schema
}

fn restore_null_types(node: &mut Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    if obj.remove("nullable") == Some(Value::Bool(true))
        && let Some(Value::String(ty)) = obj.get("type").cloned()
    {
        obj.insert("type".into(), serde_json::json!([ty, "null"]));
    }

    if let Some(Value::Object(props)) = obj.get_mut("properties") {
        for prop in props.values_mut() {
            restore_null_types(prop);
        }
    }
    if let Some(items) = obj.get_mut("items") {
        restore_null_types(items);
    }
}

/// Log a tool call at INFO level with a truncated preview of arguments.
pub fn log_tool_call(name: &str, arguments: &Value) {
    let rendered = arguments.to_string();
    let preview: String = rendered.chars().take(120).collect();
    info!(
        "[tool] {name}({preview}{})",
        if rendered.chars().count() > 120 { "..." } else { "" }
    );
    trace!("[tool] {name} arguments: {rendered}");
}

/// Deserialize call arguments into a typed struct.
pub fn parse_tool_args<T: serde::de::DeserializeOwned>(
    tool: &str,
    arguments: &Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        text: String,
    }

    fn echo() -> FnTool {
        FnTool::new(
            ToolDef::new("echo", "Echo the input", crate::json_schema_for::<EchoArgs>()),
            |args: EchoArgs| async move { Ok(serde_json::json!({ "echo": args.text }).to_string()) },
        )
    }

    struct SlowTool;

    impl Tool for SlowTool {
        fn definition(&self) -> ToolDef {
            ToolDef::new(
                "slow",
                "Sleeps",
                serde_json::json!({"type": "object", "properties": {}}),
            )
        }

        fn execute<'a>(&'a self, _arguments: &'a Value) -> ToolFuture<'a> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(ToolResult::new("slow", "{}"))
            })
        }

        fn timeout(&self) -> Option<Duration> {
            Some(Duration::from_millis(20))
        }
    }

    #[test]
    fn register_and_definitions_sorted() {
        let registry = ToolRegistry::new().with(SlowTool).with(echo());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), ["echo", "slow"]);
        let defs = registry.definitions();
        assert_eq!(defs[0].name, "echo");
    }

    #[test]
    fn resolve_known_and_unknown() {
        let registry = ToolRegistry::new().with(echo());
        assert_eq!(registry.resolve("echo").unwrap().name(), "echo");
        let err = registry.resolve("unknown_tool").err().unwrap();
        assert_eq!(err.name, "unknown_tool");
    }

    #[test]
    fn with_if_respects_condition() {
        assert_eq!(ToolRegistry::new().with_if(true, echo()).len(), 1);
        assert!(ToolRegistry::new().with_if(false, echo()).is_empty());
    }

    #[tokio::test]
    async fn execute_known_tool() {
        let registry = ToolRegistry::new().with(echo());
        let result = registry
            .execute("echo", &serde_json::json!({"text": "hello"}))
            .await
            .unwrap();
        assert_eq!(result.name, "echo");
        assert_eq!(result.payload_value()["echo"], "hello");
    }

    #[tokio::test]
    async fn execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("nope", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Unknown(_)));
    }

    #[tokio::test]
    async fn schema_violation_rejected_before_execution() {
        let registry = ToolRegistry::new().with(echo());
        let err = registry
            .execute("echo", &serde_json::json!({"text": 5}))
            .await
            .unwrap_err();
        match err {
            ToolError::InvalidArguments { tool, message } => {
                assert_eq!(tool, "echo");
                assert!(message.contains("/text"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Deserialize, JsonSchema)]
    struct LookupArgs {
        query: String,
        #[serde(default)]
        region: Option<String>,
    }

    fn lookup() -> FnTool {
        FnTool::new(
            ToolDef::new("lookup", "Look up", crate::json_schema_for::<LookupArgs>()),
            |args: LookupArgs| async move {
                Ok(serde_json::json!({ "query": args.query, "region": args.region }).to_string())
            },
        )
    }

    #[tokio::test]
    async fn explicit_null_accepted_for_optional_field() {
        let registry = ToolRegistry::new().with(lookup());
        assert_eq!(registry.definitions()[0].parameters["properties"]["region"]["nullable"], true);

        let result = registry
            .execute("lookup", &serde_json::json!({"query": "rust", "region": null}))
            .await
            .unwrap();
        assert!(result.payload_value()["region"].is_null());

        let err = registry
            .execute("lookup", &serde_json::json!({"query": "rust", "region": 7}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn null_types_restored_recursively() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string", "nullable": true}},
                "limit": {"type": "integer", "nullable": false}
            }
        });
        let restored = with_null_types(&schema);
        assert_eq!(
            restored["properties"]["tags"]["items"]["type"],
            serde_json::json!(["string", "null"])
        );
        assert_eq!(restored["properties"]["limit"]["type"], "integer");
        assert!(restored["properties"]["limit"].get("nullable").is_none());
        // The declared schema is left as sent to the model.
        assert_eq!(schema["properties"]["tags"]["items"]["nullable"], true);
    }

    #[tokio::test]
    async fn fn_tool_parse_error_without_validation() {
        let registry = ToolRegistry::new().with_arg_validation(false).with(echo());
        let err = registry
            .execute("echo", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn per_tool_timeout_enforced() {
        let registry = ToolRegistry::new().with(SlowTool);
        let err = registry
            .execute("slow", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { ref tool, .. } if tool == "slow"));
    }
}
