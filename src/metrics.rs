use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("qa_requests_total", "Total number of questions asked").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("qa_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("qa_cache_misses_total", "Total cache misses").unwrap();
    pub static ref GENERATOR_FAILURES: Counter =
        register_counter!("qa_generator_failures_total", "Total failed generations").unwrap();
    pub static ref STORE_ERRORS: Counter =
        register_counter!("qa_store_errors_total", "Total failed store calls").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "qa_request_latency_seconds",
        "Question latency in seconds"
    )
    .unwrap();
}
