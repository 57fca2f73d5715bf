//! The two inference services: tabular melanoma prediction and lesion-type
//! image classification.

pub mod image;
pub mod tabular;

pub use image::ImageClassificationService;
pub use tabular::TabularPredictionService;
