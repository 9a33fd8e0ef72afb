pub mod cpu;
pub mod error;

pub use cpu::CpuPreProcessor;
pub use error::PreprocessError;

/// Spatial size (width, height) the classifier was trained on.
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (256, 256);

/// Number of color channels in the model input (RGB).
pub const INPUT_CHANNELS: usize = 3;
