use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use qa_cache::app;
use qa_cache::config::Args;
use qa_cache::generator::{AnswerGenerator, GeminiClient};
use qa_cache::state::AppState;
use qa_cache::store::{AnswerStore, MemoryStore, PgStore};

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // parse cli arguments
    let args = Args::parse();

    let store: Arc<dyn AnswerStore> = match args.database_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect_lazy(url, args.store_timeout())
                .context("invalid DATABASE_URL")?;
            match store.ping().await {
                Ok(()) => tracing::info!("postgres store connected"),
                Err(e) => tracing::error!(error = %e, "postgres store unreachable, lookups will miss"),
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, answers are cached in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let api_key = args.api_key().map(str::to_string);
    if api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, generation requests will fail");
    }
    let generator: Arc<dyn AnswerGenerator> = Arc::new(GeminiClient::new(
        api_key,
        &args.gemini_base_url,
        &args.gemini_model,
        args.generator_timeout(),
    )?);

    // creating shared state
    let state = Arc::new(AppState::new(Arc::clone(&store), Arc::clone(&generator)));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        port = args.port,
        store = store.backend(),
        model = generator.model(),
        "server listening on http://localhost:{}",
        args.port
    );
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
