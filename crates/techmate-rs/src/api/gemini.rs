//! HTTP client for the Gemini `generateContent` REST API.
//!
//! [`GeminiClient`] turns a [`ModelRequest`] into the Gemini wire format,
//! posts it, and decides the reply once into a [`ModelResponse`]: a
//! `functionCall` part anywhere in the first candidate wins, otherwise the
//! non-thought text parts are concatenated.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::retry::{RetryConfig, retry_model_call};
use crate::conversation::{Role, Turn, TurnContent};
use crate::error::ModelError;
use crate::model::{ModelClient, ModelFuture, ModelRequest, ModelResponse, ToolCallRequest};
use crate::{DEFAULT_MODEL, GEMINI_API_BASE, ToolDef};

/// Default timeout for one model request.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(120);

/// Prompt used by [`GeminiClient::check_connection`].
pub const CONNECTION_CHECK_PROMPT: &str = "Hello! Can you introduce yourself in one sentence?";

// ── Wire types: request ────────────────────────────────────────────

/// Body of `POST models/{model}:generateContent`.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclarations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One role-tagged block of parts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Set on reasoning summaries; never part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<ToolDef>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

// ── Wire types: response ───────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

/// A model returned by `GET models`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`.
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }

    /// Name without the `models/` prefix, usable with `--model`.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

// ── Conversion ─────────────────────────────────────────────────────

/// Wire role for a turn. Tool results travel as `user` content.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Model => "model",
        Role::User | Role::Tool => "user",
    }
}

fn turn_to_part(turn: &Turn) -> Option<Part> {
    match &turn.content {
        // Gemini rejects empty text parts.
        TurnContent::Text { text } if text.is_empty() => None,
        TurnContent::Text { text } => Some(Part::text(text.clone())),
        TurnContent::ToolCall(call) => Some(Part {
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args: call.arguments.clone(),
            }),
            thought_signature: call.signature.clone(),
            ..Default::default()
        }),
        TurnContent::ToolResult(result) => Some(Part {
            function_response: Some(FunctionResponse {
                name: result.name.clone(),
                response: serde_json::json!({ "result": result.payload_value() }),
            }),
            ..Default::default()
        }),
    }
}

/// Build `contents` from turns, merging consecutive turns that share a
/// wire role into one block.
pub fn build_contents(turns: &[Turn]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();
    for turn in turns {
        let Some(part) = turn_to_part(turn) else {
            continue;
        };
        let role = wire_role(turn.role);
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![part],
            }),
        }
    }
    contents
}

/// Decide a raw response into text or a tool call.
pub fn decide_response(response: GenerateContentResponse) -> Result<ModelResponse, ModelError> {
    if let Some(err) = response.error {
        return Err(ModelError::Api(format_api_error(&err)));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ModelError::Api(format!("prompt blocked: {reason}")));
        }
        return Err(ModelError::Malformed("no candidates in response".into()));
    };

    let Some(content) = candidate.content else {
        return Err(ModelError::Malformed(format!(
            "candidate has no content (finishReason={})",
            candidate.finish_reason.as_deref().unwrap_or("none")
        )));
    };

    let mut text = String::new();
    let mut call: Option<ToolCallRequest> = None;
    for part in content.parts {
        let thought = part.is_thought();
        if let Some(fc) = part.function_call {
            if call.is_none() {
                let arguments = if fc.args.is_null() {
                    serde_json::json!({})
                } else {
                    fc.args
                };
                call = Some(
                    ToolCallRequest::new(fc.name, arguments).with_signature(part.thought_signature),
                );
            }
            continue;
        }
        if thought {
            continue;
        }
        if let Some(t) = part.text {
            text.push_str(&t);
        }
    }

    Ok(match call {
        Some(call) => ModelResponse::ToolCall { call, text },
        None => ModelResponse::Text(text),
    })
}

fn format_api_error(err: &ApiErrorBody) -> String {
    match (&err.status, err.code) {
        (Some(status), Some(code)) => format!("{code} {status}: {}", err.message),
        (Some(status), None) => format!("{status}: {}", err.message),
        (None, Some(code)) => format!("{code}: {}", err.message),
        (None, None) => err.message.clone(),
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry: RetryConfig,
    generation: GenerationConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for the default model. Fails with
    /// [`ModelError::MissingApiKey`] when the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ModelError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("techmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ModelError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_MODEL_TIMEOUT,
            retry: RetryConfig::default(),
            generation: GenerationConfig::default(),
        })
    }

    /// Point the client at another API root (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Select the model. A `models/` prefix is accepted and dropped.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = model
            .strip_prefix("models/")
            .map(str::to_string)
            .unwrap_or(model);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.generation.max_output_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Translate a [`ModelRequest`] into the wire body.
    pub fn build_request(&self, request: &ModelRequest) -> GenerateContentRequest {
        let tools = if request.tools.is_empty() {
            vec![]
        } else {
            vec![ToolDeclarations {
                function_declarations: request.tools.clone(),
            }]
        };
        GenerateContentRequest {
            system_instruction: request
                .system_prompt
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(Content::system),
            contents: build_contents(&request.turns()),
            tools,
            generation_config: Some(self.generation.clone()).filter(|g| !g.is_empty()),
        }
    }

    /// Post a raw `generateContent` body, with retry on transient errors.
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(
            "LLM request: model={}, contents={}, tools={}",
            self.model,
            body.contents.len(),
            body.tools
                .iter()
                .map(|t| t.function_declarations.len())
                .sum::<usize>(),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let this = self;
        let url = url.as_str();
        let response: GenerateContentResponse = retry_model_call(&self.retry, move || {
            this.send(this.client.post(url).json(body))
        })
        .await?;

        if let Some(usage) = response.usage_metadata {
            debug!(
                "Token usage: prompt={}, candidates={}, total={}",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
                usage.total_token_count.unwrap_or(0),
            );
        }
        Ok(response)
    }

    /// List every model visible to this key, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ModelError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let url = match &page_token {
                Some(token) => format!(
                    "{}/models?pageToken={}",
                    self.base_url,
                    urlencoding::encode(token)
                ),
                None => format!("{}/models", self.base_url),
            };
            let this = self;
            let url = url.as_str();
            let page: ListModelsResponse =
                retry_model_call(&self.retry, move || this.send(this.client.get(url))).await?;
            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!("Listed {} models", models.len());
        Ok(models)
    }

    /// One-shot prompt with no history and no tools.
    pub async fn quick_completion(&self, prompt: &str) -> Result<String, ModelError> {
        let request = ModelRequest::new(prompt);
        let response = self.generate(&request).await?;
        Ok(response.text().to_string())
    }

    /// Send the fixed introduction prompt and return the reply.
    pub async fn check_connection(&self) -> Result<String, ModelError> {
        self.quick_completion(CONNECTION_CHECK_PROMPT).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ModelError> {
        let start = Instant::now();
        let exchange = async {
            let resp = builder
                .header("x-goog-api-key", &self.api_key)
                .send()
                .await
                .map_err(|e| ModelError::Transport(format!("request failed: {e}")))?;
            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| ModelError::Transport(format!("failed to read response: {e}")))?;
            Ok::<_, ModelError>((status, text))
        };
        let (status, text) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            let body = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|env| format_api_error(&env.error))
                .unwrap_or(text);
            return Err(ModelError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ModelError::Malformed(format!("failed to parse response: {e}")))
    }
}

impl ModelClient for GeminiClient {
    fn generate<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a> {
        Box::pin(async move {
            let body = self.build_request(request);
            let raw = self.generate_content(&body).await?;
            let decided = decide_response(raw)?;
            match &decided {
                ModelResponse::Text(text) => debug!("LLM output: {} chars text", text.len()),
                ModelResponse::ToolCall { call, text } => debug!(
                    "LLM output: tool call {} ({} chars text)",
                    call.name,
                    text.len()
                ),
            }
            Ok(decided)
        })
    }
}
