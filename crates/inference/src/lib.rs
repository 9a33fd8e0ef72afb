pub mod backend;
pub mod error;
pub mod postprocessing;
pub mod predictor;

// Re-export commonly used types for convenience
pub use backend::{BackendOptions, ExecutionProvider, InferenceBackend, InferenceOutput};
pub use error::{ErrorKind, PredictError};
pub use postprocessing::{CLASS_NAMES, Prediction};
pub use predictor::Predictor;
