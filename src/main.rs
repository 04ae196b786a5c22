use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use nova_assistant::core::config::AppPaths;
use nova_assistant::core::logging;
use nova_assistant::server;
use nova_assistant::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    logging::init(&paths);

    let state = AppState::initialize(paths)
        .await
        .context("Failed to initialize application state")?;

    let retriever = state.orchestrator.retriever();
    if !retriever.index_loaded() || !retriever.model_loaded() {
        tracing::warn!(
            index_loaded = retriever.index_loaded(),
            model_loaded = retriever.model_loaded(),
            "Retrieval is degraded; every question will get the not-found answer"
        );
    }
    if !state.orchestrator.backend().has_credentials() {
        tracing::warn!(
            "No API key in {}; chat requests will fail until it is set",
            state.config.generation.api_key_env
        );
    }

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
