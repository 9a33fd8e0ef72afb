use crate::{DEFAULT_INPUT_SIZE, INPUT_CHANNELS, PreprocessError};
use common::{span, span_debug};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use image::RgbImage;
use ndarray::Array4;

/// Turns encoded image bytes into the `[1, 3, H, W]` tensor the classifier
/// expects: RGB, plain stretch to `input_size`, values scaled to `[0, 1]`.
///
/// Holds no per-call buffers, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self { input_size }
    }

    /// Decode, convert to RGB, resize and normalize in one pass.
    pub fn preprocess(&self, encoded: &[u8]) -> Result<Array4<f32>, PreprocessError> {
        let _s = span!("preprocess_image");

        let rgb = Self::decode(encoded)?;
        self.preprocess_rgb(&rgb)
    }

    /// Resize and normalize an already decoded RGB image.
    pub fn preprocess_rgb(&self, rgb: &RgbImage) -> Result<Array4<f32>, PreprocessError> {
        let resized = self.resize(rgb.as_raw(), rgb.width(), rgb.height())?;
        Self::normalize(&resized)
    }

    /// Decode any supported format and flatten it to 8-bit RGB.
    ///
    /// Alpha is dropped and single-channel images are replicated across R, G and B.
    pub fn decode(encoded: &[u8]) -> Result<RgbImage, PreprocessError> {
        let _s = span_debug!("decode_image");

        let decoded = image::load_from_memory(encoded)?;

        tracing::trace!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            encoded_bytes = encoded.len(),
            "Decoded image"
        );

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(PreprocessError::EmptyImage {
                width: decoded.width(),
                height: decoded.height(),
            });
        }

        Ok(decoded.to_rgb8())
    }

    fn resize(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Image<'static>, PreprocessError> {
        let _s = span_debug!("resize_image");

        let src = ImageRef::new(width, height, pixels, PixelType::U8x3)?;
        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        Resizer::new().resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
        )?;

        Ok(resized)
    }

    /// Interleaved HWC `u8` → planar CHW `f32 / 255` with a leading batch axis.
    fn normalize(image: &Image) -> Result<Array4<f32>, PreprocessError> {
        let _s = span_debug!("normalize");

        let width = image.width() as usize;
        let height = image.height() as usize;
        let spatial = width * height;

        let mut output = vec![0.0f32; INPUT_CHANNELS * spatial];

        for (i, px) in image.buffer().chunks_exact(INPUT_CHANNELS).enumerate() {
            output[i] = px[0] as f32 / 255.0;
            output[i + spatial] = px[1] as f32 / 255.0;
            output[i + 2 * spatial] = px[2] as f32 / 255.0;
        }

        Ok(Array4::from_shape_vec(
            (1, INPUT_CHANNELS, height, width),
            output,
        )?)
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE)
    }
}
