//! Lookup-or-generate flow: cached answer on a hit, Gemini on a miss.

use std::time::Instant;

use crate::cache::{is_cacheable, make_cache_key};
use crate::generator::{AnswerGenerator, FailureKind, GenerationParams};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, GENERATOR_FAILURES, STORE_ERRORS};
use crate::models::QaRecord;
use crate::store::AnswerStore;

pub const EMPTY_QUESTION_PROMPT: &str = "Please ask a question.";

pub const ANSWER_PARAMS: GenerationParams = GenerationParams {
    temperature: Some(0.7),
    max_output_tokens: Some(200),
};

// Generation prompt wraps the question as the user typed it
pub fn build_prompt(question: &str) -> String {
    format!("Answer this question concisely in 2-3 sentences: {question}")
}

/// Result of one lookup-or-generate pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// No question was given.
    Prompt,
    Cached(String),
    Generated(String),
    Failed { kind: FailureKind, message: String },
}

impl Answer {
    /// Text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            Self::Prompt => EMPTY_QUESTION_PROMPT,
            Self::Cached(text) | Self::Generated(text) => text,
            Self::Failed { message, .. } => message,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Prompt => EMPTY_QUESTION_PROMPT.to_string(),
            Self::Cached(text) | Self::Generated(text) => text,
            Self::Failed { message, .. } => message,
        }
    }
}

pub async fn lookup_or_generate(
    store: &dyn AnswerStore,
    generator: &dyn AnswerGenerator,
    question: Option<&str>,
) -> Answer {
    let Some(question) = question.filter(|q| !q.trim().is_empty()) else {
        return Answer::Prompt;
    };
    let key = make_cache_key(question);

    // check store first, a failing store counts as a miss
    match store.find_answer(&key).await {
        Ok(Some(answer)) => {
            CACHE_HITS.inc();
            tracing::info!(question = %key, "cache hit");
            return Answer::Cached(answer);
        }
        Ok(None) => {}
        Err(e) => {
            STORE_ERRORS.inc();
            tracing::warn!(error = %e, backend = store.backend(), "store lookup failed, treating as miss");
        }
    }
    CACHE_MISSES.inc();

    let started = Instant::now();
    let answer = match generator.generate(&build_prompt(question), ANSWER_PARAMS).await {
        Ok(text) => Answer::Generated(text.trim().to_string()),
        Err(e) => {
            GENERATOR_FAILURES.inc();
            tracing::warn!(error = %e, model = generator.model(), "generation failed");
            let kind = FailureKind::from(&e);
            let message = kind.user_message();
            Answer::Failed { kind, message }
        }
    };
    tracing::info!(
        question = %key,
        elapsed = ?started.elapsed(),
        "cache miss answered"
    );

    if let Answer::Generated(text) = &answer {
        if is_cacheable(text) {
            match store.insert(&QaRecord::new(key, text.clone())).await {
                Ok(true) => tracing::info!("answer saved to store"),
                Ok(false) => tracing::debug!("answer already stored by a concurrent request"),
                Err(e) => {
                    STORE_ERRORS.inc();
                    tracing::warn!(error = %e, "failed to save answer");
                }
            }
        } else {
            tracing::debug!("answer not cached");
        }
    }
    answer
}
