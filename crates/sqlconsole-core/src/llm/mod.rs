//! Language-model access.
//!
//! [`LanguageModel`] is the seam the orchestrator talks to. The default
//! implementation is [`OpenAiClient`], which speaks the OpenAI-compatible
//! chat-completion protocol (Groq, OpenAI, local servers, …).

pub mod openai;

use std::future::Future;

pub use openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiClient};

use crate::error::LlmError;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Default OpenAI-compatible endpoint root (Groq).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// A chat-completion backend returning one completion text per request.
pub trait LanguageModel: Send + Sync {
    fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}
