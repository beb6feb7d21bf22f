mod ask;
mod diagnostics;
mod health;
mod metrics;

pub use ask::{ask_handler, index_handler, script_handler};
pub use diagnostics::{
    clear_db_handler, list_models_handler, test_api_handler, test_store_handler,
    view_db_handler,
};
pub use health::health_handler;
pub use metrics::metrics_handler;
