//! Lesion-type image classification.

use crate::core::errors::DermResult;
use crate::core::inference::OnnxModel;
use crate::domain::diagnosis::ClassDistribution;
use crate::processors::image::ImagePreprocessor;
use image::DynamicImage;
use ndarray::Array4;

/// Runs the lesion-type CNN over uploaded images.
///
/// Owns the loaded classifier and the preprocessing pipeline; each call
/// prepares one image, runs one forward pass, and maps the 7-element output
/// vector onto the fixed lesion-class table.
#[derive(Debug)]
pub struct ImageClassificationService {
    model: OnnxModel,
    preprocessor: ImagePreprocessor,
}

impl ImageClassificationService {
    /// Creates the service around a loaded classifier.
    pub fn new(model: OnnxModel) -> Self {
        Self {
            model,
            preprocessor: ImagePreprocessor::new(),
        }
    }

    /// Classifies a decoded image into the 7-class lesion distribution.
    pub fn classify(&self, image: &DynamicImage) -> DermResult<ClassDistribution> {
        let tensor = self.preprocessor.prepare(image)?;
        self.classify_tensor(&tensor)
    }

    /// Decodes raw upload bytes and classifies them.
    pub fn classify_bytes(&self, bytes: &[u8]) -> DermResult<ClassDistribution> {
        let tensor = self.preprocessor.prepare_bytes(bytes)?;
        self.classify_tensor(&tensor)
    }

    fn classify_tensor(&self, tensor: &Array4<f32>) -> DermResult<ClassDistribution> {
        let probabilities = self.model.probabilities_from_image(tensor)?;
        let row = probabilities.row(0).to_vec();
        let distribution = ClassDistribution::from_probabilities(&row)?;

        let (class, confidence) = distribution.predicted();
        tracing::debug!(
            model = self.model.model_name(),
            predicted = class.code(),
            confidence,
            "image classification complete"
        );
        Ok(distribution)
    }
}
