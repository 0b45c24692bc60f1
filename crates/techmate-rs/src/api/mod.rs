//! Remote model access: the Gemini HTTP client and retry with backoff.
//!
//! - [`gemini`]: [`GeminiClient`], the [`ModelClient`](crate::ModelClient)
//!   implementation for the `generateContent` endpoint, plus model listing.
//! - [`retry`]: transient error detection (429, 5xx, transport failures,
//!   timeouts) with exponential backoff and jitter. Never retries 4xx
//!   client errors other than 429.

pub mod gemini;
pub mod retry;

pub use gemini::{GeminiClient, ModelInfo};
pub use retry::RetryConfig;
