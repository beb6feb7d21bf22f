// Prefixes that mark an answer as a failure message rather than a real answer
pub const FAILURE_MARKERS: [&str; 3] = ["❌", "⏰", "⚠️"];

// Create a cache key (trimmed, lowercased question)
pub fn make_cache_key(question: &str) -> String {
    question.trim().to_lowercase()
}

pub fn has_failure_marker(answer: &str) -> bool {
    FAILURE_MARKERS.iter().any(|m| answer.starts_with(m))
}

// Only non-empty answers without a failure marker go to the store
pub fn is_cacheable(answer: &str) -> bool {
    !answer.is_empty() && !has_failure_marker(answer)
}
