//! Image preprocessing for the lesion-type CNN.
//!
//! The classifier was trained on 224×224 RGB crops scaled into [0, 1] with
//! no mean/std normalization, channels-last. Serving must reproduce that
//! pipeline exactly: resize (aspect ratio ignored, no letterboxing or
//! cropping), byte intensities × 1/255, leading batch dimension.

use crate::core::errors::{DermError, DermResult};
use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;
/// Input channel count (RGB).
pub const CHANNELS: usize = 3;

/// Turns arbitrary uploaded images into `(1, 224, 224, 3)` input tensors.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    size: u32,
    scale: f32,
    filter: FilterType,
}

impl ImagePreprocessor {
    /// Creates a preprocessor with the trained input geometry.
    pub fn new() -> Self {
        Self {
            size: INPUT_SIZE,
            scale: 1.0 / 255.0,
            filter: FilterType::Lanczos3,
        }
    }

    /// Decodes raw upload bytes and prepares the input tensor.
    ///
    /// Fails with [`DermError::UnsupportedImage`] when the bytes are not a
    /// decodable image.
    pub fn prepare_bytes(&self, bytes: &[u8]) -> DermResult<Array4<f32>> {
        let image = image::load_from_memory(bytes).map_err(DermError::UnsupportedImage)?;
        self.prepare(&image)
    }

    /// Prepares the input tensor from a decoded image.
    ///
    /// Steps, in order: resize to the square input size regardless of source
    /// aspect ratio, extract RGB byte intensities channels-last, scale by
    /// 1/255, insert a leading batch dimension of 1.
    pub fn prepare(&self, image: &DynamicImage) -> DermResult<Array4<f32>> {
        let resized = image.resize_exact(self.size, self.size, self.filter);
        let rgb = resized.to_rgb8();

        let side = self.size as usize;
        let mut data = vec![0.0f32; side * side * CHANNELS];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let base = (y as usize * side + x as usize) * CHANNELS;
            for c in 0..CHANNELS {
                data[base + c] = pixel[c] as f32 * self.scale;
            }
        }

        Array4::from_shape_vec((1, side, side, CHANNELS), data).map_err(DermError::Tensor)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
