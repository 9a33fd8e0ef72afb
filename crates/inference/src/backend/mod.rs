use ndarray::{Array4, ArrayD};
use serde::Deserialize;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded model that can be evaluated concurrently from many requests.
///
/// Implementations own any locking they need; callers only ever hold `&self`.
pub trait InferenceBackend: Send + Sync {
    fn load_model(path: &str) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run the model on a `[batch, 3, H, W]` input tensor.
    fn infer(&self, images: &Array4<f32>) -> anyhow::Result<InferenceOutput>;
}

pub struct InferenceOutput {
    pub logits: ArrayD<f32>, // [batch, num_labels] raw attribute logits
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

impl ExecutionProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionProvider::Cpu => "cpu",
            ExecutionProvider::Cuda => "cuda",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub provider: ExecutionProvider,
    pub intra_threads: usize,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            provider: ExecutionProvider::Cpu,
            intra_threads: 4,
        }
    }
}
