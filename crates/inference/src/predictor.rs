use crate::{
    backend::{InferenceBackend, InferenceOutput},
    error::PredictError,
    postprocessing::{Prediction, gender_from_output},
};
use preprocess::CpuPreProcessor;

/// Image bytes in, gender label out.
///
/// Stateless between calls; share one instance behind an `Arc`.
pub struct Predictor<B: InferenceBackend> {
    backend: B,
    preprocessor: CpuPreProcessor,
}

impl<B: InferenceBackend> Predictor<B> {
    pub fn new(backend: B) -> Self {
        Self::with_preprocessor(backend, CpuPreProcessor::default())
    }

    pub fn with_preprocessor(backend: B, preprocessor: CpuPreProcessor) -> Self {
        Self {
            backend,
            preprocessor,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[tracing::instrument(skip_all, fields(image_bytes = image_bytes.len()))]
    pub fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, PredictError> {
        let tensor = self.preprocessor.preprocess(image_bytes)?;

        let InferenceOutput { logits } = {
            let _infer_span = tracing::info_span!("model_inference").entered();
            self.backend.infer(&tensor).map_err(PredictError::Engine)?
        };

        tracing::trace!(shape = ?logits.shape(), "Model output");

        let prediction = gender_from_output(&logits)?;

        tracing::debug!(
            class_name = %prediction.class_name,
            percentage = prediction.percentage,
            "Prediction complete"
        );

        Ok(prediction)
    }
}
