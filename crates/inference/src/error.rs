use crate::postprocessing::PostprocessError;
use preprocess::PreprocessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{0}")]
    Decode(PreprocessError),

    #[error("inference engine error: {0:#}")]
    Engine(anyhow::Error),

    #[error("{0:#}")]
    Unknown(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Engine,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode_error",
            ErrorKind::Engine => "engine_error",
            ErrorKind::Unknown => "unknown_error",
        }
    }
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::Decode(_) => ErrorKind::Decode,
            PredictError::Engine(_) => ErrorKind::Engine,
            PredictError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn unknown(message: impl std::fmt::Display) -> Self {
        PredictError::Unknown(anyhow::anyhow!("{}", message))
    }
}

impl From<PreprocessError> for PredictError {
    fn from(err: PreprocessError) -> Self {
        if err.is_decode() {
            PredictError::Decode(err)
        } else {
            PredictError::Unknown(err.into())
        }
    }
}

impl From<PostprocessError> for PredictError {
    fn from(err: PostprocessError) -> Self {
        PredictError::Engine(err.into())
    }
}
