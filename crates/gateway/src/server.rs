use crate::{
    config::Config,
    routes::{health, predict},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use inference::InferenceBackend;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router<B: InferenceBackend + 'static>(state: AppState<B>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/predict", post(predict::<B>))
        .route("/health", get(health::<B>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server<B: InferenceBackend + 'static>(
    config: &Config,
    state: AppState<B>,
) -> anyhow::Result<()> {
    let app = router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("HTTP server listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
