//! Domain types: clinical input records, the trained column schema, and
//! typed diagnostic results.

pub mod diagnosis;
pub mod record;
pub mod schema;

pub use diagnosis::{
    ClassDistribution, Diagnosis, DiagnosticResult, LesionClass, MELANOMA_THRESHOLD,
};
pub use record::{ClinicalRecord, ConfirmationMethod, Localization, MAX_AGE, Sex};
pub use schema::ColumnSchema;
