use common::{Environment, LogLevel};
use inference::{BackendOptions, ExecutionProvider};
use serde::Deserialize;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub listen_addr: String,
    pub model_path: String,
    pub execution_provider: ExecutionProvider,
    pub intra_threads: usize,
    pub max_upload_bytes: usize,
    pub otel_endpoint: Option<String>,
}

impl Config {
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            provider: self.execution_provider,
            intra_threads: self.intra_threads,
        }
    }
}

/// Defaults overridden by `GATEWAY_*` environment variables,
/// e.g. `GATEWAY_MODEL_PATH=/models/attributes.onnx`.
pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default("listen_addr", "0.0.0.0:8000")?
        .set_default("model_path", "model_webgpu.onnx")?
        .set_default("execution_provider", "cpu")?
        .set_default("intra_threads", 4_i64)?
        .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
        .add_source(
            config::Environment::with_prefix("GATEWAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = config.try_deserialize::<Config>()?;

    Ok(config)
}
