//! # derm-screen
//!
//! Inference serving for skin-lesion risk assessment, backed by ONNX
//! Runtime. Two independent paths share the same serving discipline:
//!
//! - **Tabular**: a clinical-features record (age, sex, lesion localization,
//!   confirmation method) is encoded into a feature vector aligned to the
//!   exact column schema the model was trained on, and the model's melanoma
//!   probability is thresholded into a binary diagnosis.
//! - **Image**: an uploaded lesion photo is resized and scaled into the
//!   normalized tensor the CNN expects, and the 7-class output vector is
//!   mapped onto the fixed lesion-type table with its arg-max prediction.
//!
//! Artifacts (both models and the column schema) are loaded exactly once at
//! startup into an immutable [`core::InferenceContext`]; every inference
//! call is stateless and safe for concurrent use.
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, ONNX Runtime execution, inference context
//! * [`domain`] - Clinical records, the column schema, diagnostic results
//! * [`processors`] - Feature encoding and image preprocessing
//! * [`service`] - The two inference services
//! * [`http`] - The tabular prediction HTTP contract
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use derm_screen::core::{ArtifactConfig, InferenceContext};
//! use derm_screen::domain::{ClinicalRecord, ConfirmationMethod, Localization, Sex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: ArtifactConfig = serde_json::from_str(r#"
//! {
//!   "tabular_model": "saved_models/melanoma.onnx",
//!   "column_schema": "saved_models/model_columns.json",
//!   "image_model": "saved_models/lesion_classifier.onnx"
//! }
//! "#)?;
//! let context = InferenceContext::load(&config)?;
//!
//! let record = ClinicalRecord {
//!     age: 55.0,
//!     sex: Sex::Male,
//!     localization: Localization::LowerExtremity,
//!     confirmation: ConfirmationMethod::FollowUp,
//! };
//! let result = context.tabular().predict(&record)?;
//! println!("{}: {:.2}%", result.diagnosis.wire_label(), result.probability * 100.0);
//!
//! let bytes = std::fs::read("lesion.jpg")?;
//! let distribution = context.image().classify_bytes(&bytes)?;
//! let (class, confidence) = distribution.predicted();
//! println!("{} ({:.2}%)", class.full_name(), confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod http;
pub mod processors;
pub mod service;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use derm_screen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ArtifactConfig, DermError, DermResult, InferenceContext};
    pub use crate::domain::{
        ClassDistribution, ClinicalRecord, ColumnSchema, ConfirmationMethod, Diagnosis,
        DiagnosticResult, LesionClass, Localization, Sex,
    };
    pub use crate::service::{ImageClassificationService, TabularPredictionService};
}
