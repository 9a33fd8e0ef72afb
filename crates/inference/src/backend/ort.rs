use super::{BackendOptions, ExecutionProvider, InferenceBackend, InferenceOutput};
use ndarray::Array4;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::path::Path;
use std::sync::Mutex;

/// ONNX Runtime session wrapper.
///
/// `Session::run` needs `&mut`, so evaluation is serialized behind a mutex;
/// decode and resize on the caller side still run in parallel.
pub struct OrtBackend {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OrtBackend {
    /// Load model with the given execution provider and thread count
    pub fn load_model_with_options(path: &str, options: &BackendOptions) -> anyhow::Result<Self> {
        if !Path::new(path).is_file() {
            anyhow::bail!("Model file not found: {}", path);
        }

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(options.intra_threads)?;

        match options.provider {
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(path)?;

        for input in &session.inputs {
            tracing::info!(name = %input.name, input_type = ?input.input_type, "Model input");
        }
        for output in &session.outputs {
            tracing::info!(name = %output.name, output_type = ?output.output_type, "Model output");
        }

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| anyhow::anyhow!("Model declares no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| anyhow::anyhow!("Model declares no outputs"))?;

        tracing::info!(
            path,
            input = %input_name,
            output = %output_name,
            intra_threads = options.intra_threads,
            "Model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &str) -> anyhow::Result<Self> {
        Self::load_model_with_options(path, &BackendOptions::default())
    }

    fn infer(&self, images: &Array4<f32>) -> anyhow::Result<InferenceOutput> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

        let outputs = session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(images.view().into_dyn())?
        ])?;

        let logits = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()?
            .into_owned();

        Ok(InferenceOutput { logits })
    }
}
