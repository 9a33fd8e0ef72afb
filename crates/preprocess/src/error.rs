use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("decoded image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("invalid pixel buffer: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl PreprocessError {
    /// True when the input bytes themselves were unusable, as opposed to a
    /// failure inside the resize/normalize pipeline.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::EmptyImage { .. })
    }
}
