//! One-time loading of serving artifacts into an immutable context.
//!
//! Both models and the column schema are loaded exactly once during process
//! initialization and treated as read-only for the remainder of the process
//! lifetime. Loading either succeeds completely (Ready) or fails at
//! construction (Failed, terminal until restart); nothing is discovered
//! lazily on the first request.

use crate::core::errors::DermResult;
use crate::core::inference::{OnnxModel, SessionOptions};
use crate::domain::schema::ColumnSchema;
use crate::processors::features::{FeatureEncoder, SchemaDriftPolicy};
use crate::service::image::ImageClassificationService;
use crate::service::tabular::TabularPredictionService;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations of the persisted serving artifacts plus load-time options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Serialized tabular melanoma model.
    pub tabular_model: PathBuf,
    /// Serialized ordered column-name list the tabular model was fit on.
    pub column_schema: PathBuf,
    /// Serialized lesion-type image classifier.
    pub image_model: PathBuf,
    /// Session construction options shared by both models.
    #[serde(default)]
    pub session: SessionOptions,
    /// How the feature encoder treats columns missing from the schema.
    #[serde(default)]
    pub drift_policy: SchemaDriftPolicy,
}

/// Immutable serving state: both loaded models and the column schema.
///
/// Constructed once at startup and shared by reference; every inference call
/// is pure with respect to this state, so no locking beyond the model's own
/// session pool is needed.
#[derive(Debug)]
pub struct InferenceContext {
    tabular: TabularPredictionService,
    image: ImageClassificationService,
}

impl InferenceContext {
    /// Loads every artifact, failing on the first one that is absent or
    /// malformed. A failed load is fatal until restart; callers that keep
    /// serving must hold the absence explicitly rather than retry.
    pub fn load(config: &ArtifactConfig) -> DermResult<Self> {
        let schema = ColumnSchema::load(&config.column_schema)?;
        let tabular_model = OnnxModel::load(&config.tabular_model, &config.session)?;
        let image_model = OnnxModel::load(&config.image_model, &config.session)?;

        let encoder = FeatureEncoder::new(config.drift_policy);
        tracing::info!(drift_policy = ?config.drift_policy, "inference context ready");

        Ok(Self {
            tabular: TabularPredictionService::new(tabular_model, schema, encoder),
            image: ImageClassificationService::new(image_model),
        })
    }

    /// The tabular melanoma prediction service.
    pub fn tabular(&self) -> &TabularPredictionService {
        &self.tabular
    }

    /// The lesion-type image classification service.
    pub fn image(&self) -> &ImageClassificationService {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_fails_when_artifacts_are_absent() {
        let config = ArtifactConfig {
            tabular_model: "no/such/model.onnx".into(),
            column_schema: "no/such/columns.json".into(),
            image_model: "no/such/cnn.onnx".into(),
            session: SessionOptions::default(),
            drift_policy: SchemaDriftPolicy::default(),
        };
        assert!(InferenceContext::load(&config).is_err());
    }

    #[test]
    fn artifact_config_roundtrips_through_json() {
        let json = r#"{
            "tabular_model": "saved_models/melanoma.onnx",
            "column_schema": "saved_models/model_columns.json",
            "image_model": "saved_models/lesion_classifier.onnx"
        }"#;
        let config: ArtifactConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.drift_policy, SchemaDriftPolicy::Ignore);
        assert!(config.session.pool_size.is_none());
    }
}
