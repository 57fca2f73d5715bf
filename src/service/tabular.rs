//! Tabular melanoma prediction.

use crate::core::errors::{DermError, DermResult};
use crate::core::inference::OnnxModel;
use crate::domain::diagnosis::DiagnosticResult;
use crate::domain::record::ClinicalRecord;
use crate::domain::schema::ColumnSchema;
use crate::processors::features::{FeatureEncoder, FeatureVector};
use std::collections::HashMap;

/// Runs the tabular melanoma classifier over encoded clinical records.
///
/// Holds the loaded model and the training-time column schema; every call is
/// stateless with respect to both. Input validation happens before the model
/// is touched, and anything the model raises is surfaced as a typed
/// inference failure, never swallowed.
#[derive(Debug)]
pub struct TabularPredictionService {
    model: OnnxModel,
    schema: ColumnSchema,
    encoder: FeatureEncoder,
}

impl TabularPredictionService {
    /// Creates the service from its loaded parts.
    pub fn new(model: OnnxModel, schema: ColumnSchema, encoder: FeatureEncoder) -> Self {
        Self {
            model,
            schema,
            encoder,
        }
    }

    /// The column schema predictions are aligned to.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Predicts melanoma risk for a typed clinical record.
    pub fn predict(&self, record: &ClinicalRecord) -> DermResult<DiagnosticResult> {
        let vector = self.encoder.encode(record, &self.schema)?;
        self.predict_vector(&vector)
    }

    /// Predicts melanoma risk from a raw name→value feature map, as received
    /// on the wire. The map must be a reordering of the schema's columns.
    pub fn predict_features(
        &self,
        features: &HashMap<String, f64>,
    ) -> DermResult<DiagnosticResult> {
        let vector = self.encoder.align(features, &self.schema)?;
        self.predict_vector(&vector)
    }

    fn predict_vector(&self, vector: &FeatureVector) -> DermResult<DiagnosticResult> {
        let input = vector.to_tensor();
        let probabilities = self.model.probabilities_from_features(&input)?;

        // predict_proba layout: one row, positive class in column 1.
        let melanoma = match probabilities.ncols() {
            2 => probabilities[[0, 1]],
            1 => probabilities[[0, 0]],
            n => {
                return Err(DermError::unexpected_output(
                    "a binary probability output",
                    format!("{n} classes"),
                ));
            }
        };

        if !(0.0..=1.0).contains(&melanoma) {
            return Err(DermError::unexpected_output(
                "a probability in [0, 1]",
                melanoma.to_string(),
            ));
        }

        let result = DiagnosticResult::from_probability(melanoma);
        tracing::debug!(
            model = self.model.model_name(),
            probability = melanoma,
            diagnosis = result.diagnosis.wire_label(),
            "tabular prediction complete"
        );
        Ok(result)
    }
}
