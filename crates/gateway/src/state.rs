use crate::metrics::PredictMetrics;
use inference::{InferenceBackend, Predictor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMessage {
    pub status: String,
    pub model_path: String,
}

/// Shared per-process state handed to every handler.
pub struct AppState<B: InferenceBackend> {
    pub predictor: Arc<Predictor<B>>,
    pub metrics: PredictMetrics,
    pub model_path: Arc<str>,
}

impl<B: InferenceBackend> AppState<B> {
    pub fn new(predictor: Predictor<B>, model_path: &str) -> Self {
        Self {
            predictor: Arc::new(predictor),
            metrics: PredictMetrics::new("gateway"),
            model_path: Arc::from(model_path),
        }
    }
}

// Derived Clone would require `B: Clone`
impl<B: InferenceBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            predictor: Arc::clone(&self.predictor),
            metrics: self.metrics.clone(),
            model_path: Arc::clone(&self.model_path),
        }
    }
}
