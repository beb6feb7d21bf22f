//! Answer generator: text completion behind a trait, with Gemini as the
//! production backend.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ModelInfo;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("response blocked by SAFETY filters ({0})")]
    Blocked(String),
    #[error("empty response: no candidates returned")]
    EmptyResponse,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

/// Sampling settings for one generation call. `None` leaves the
/// backend default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Model identifier used for generation.
    fn model(&self) -> &str;

    fn has_api_key(&self) -> bool;

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GeneratorError>;

    /// Models that support text generation.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GeneratorError>;
}

/// User-facing category of a failed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidCredentials,
    RateLimited,
    SafetyBlocked,
    Other(String),
}

impl FailureKind {
    /// Classifies a failure from its textual detail. First match wins.
    pub fn classify(detail: &str) -> Self {
        if detail.contains("API_KEY_INVALID") || detail.contains("401") {
            Self::InvalidCredentials
        } else if detail.to_lowercase().contains("quota") || detail.contains("429") {
            Self::RateLimited
        } else if detail.contains("SAFETY") {
            Self::SafetyBlocked
        } else {
            Self::Other(detail.to_string())
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => {
                "❌ Invalid API key. Please check your GEMINI_API_KEY setting.".to_string()
            }
            Self::RateLimited => {
                "⏰ Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            Self::SafetyBlocked => {
                "⚠️ Response blocked by safety filters. Try rephrasing your question.".to_string()
            }
            Self::Other(detail) => format!("❌ Error: {detail}"),
        }
    }
}

impl From<&GeneratorError> for FailureKind {
    fn from(err: &GeneratorError) -> Self {
        Self::classify(&err.to_string())
    }
}
