//! Input processors: feature encoding for the tabular path and image
//! preprocessing for the CNN path.

pub mod features;
pub mod image;

pub use features::{AGE_COLUMN, FeatureEncoder, FeatureVector, SchemaDriftPolicy};
pub use image::{CHANNELS, INPUT_SIZE, ImagePreprocessor};
