use common::TelemetryGuard;
use gateway::{
    config::get_configuration, logging::setup_logging, server::run_server, state::AppState,
};
use inference::{Predictor, backend::ort::OrtBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration()?;

    let _telemetry = match config.otel_endpoint.as_deref() {
        Some(endpoint) => Some(TelemetryGuard::init(
            "gateway",
            endpoint,
            config.log_level,
            config.environment,
        )?),
        None => {
            setup_logging(&config);
            None
        }
    };

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    tracing::info!(
        model_path = %config.model_path,
        provider = config.execution_provider.as_str(),
        "Loading inference model"
    );
    let backend = OrtBackend::load_model_with_options(&config.model_path, &config.backend_options())?;
    tracing::info!(
        labels = inference::CLASS_NAMES.len(),
        "Model loaded successfully"
    );

    let state = AppState::new(Predictor::new(backend), &config.model_path);
    run_server(&config, state).await
}
