//! Error types for the inference-serving pipeline.
//!
//! This module defines the error taxonomy shared by both inference paths:
//! input validation failures, missing serving artifacts, wrapped model
//! failures, and undecodable image uploads, along with the ambient error
//! sources (I/O, session creation, tensor shape mismatches) that surface
//! during startup.

use thiserror::Error;

/// Convenient result alias for inference operations.
pub type DermResult<T> = Result<T, DermError>;

/// Errors raised by the inference-serving pipeline.
///
/// Validation failures are recoverable by the caller resubmitting corrected
/// input. `ServiceUnavailable` is a startup condition, fatal until the
/// process is restarted with the artifacts in place. Everything raised by a
/// model during a call is wrapped as `Inference` with the cause preserved.
#[derive(Error, Debug)]
pub enum DermError {
    /// Malformed or out-of-range input, rejected before any model is touched.
    #[error("validation: {message}")]
    Validation {
        /// Human-readable description of what was rejected.
        message: String,
    },

    /// A required serving artifact is missing or failed to load.
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        /// Which artifact is absent and why the service cannot answer.
        message: String,
    },

    /// The underlying model raised during an inference call.
    #[error("inference failed for model '{model}': {context}")]
    Inference {
        /// Name of the model that raised.
        model: String,
        /// What the call was doing when it failed.
        context: String,
        /// The underlying error, never swallowed.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The uploaded bytes could not be decoded as an image.
    #[error("unsupported image")]
    UnsupportedImage(#[source] image::ImageError),

    /// A model produced an output layout the service does not understand.
    #[error("unexpected model output: expected {expected}, got {actual}")]
    UnexpectedOutput {
        /// Expected output description (class count or shape).
        expected: String,
        /// What the model actually produced.
        actual: String,
    },

    /// The column-schema artifact is malformed.
    #[error("schema: {message}")]
    Schema {
        /// Description of the schema defect.
        message: String,
    },

    /// A model artifact could not be loaded at startup.
    #[error("model load failed for '{path}': {context}")]
    ModelLoad {
        /// Path of the artifact that failed to load.
        path: std::path::PathBuf,
        /// What went wrong.
        context: String,
        /// The underlying loader error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl DermError {
    /// Creates a validation error from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a `ServiceUnavailable` error naming the missing artifact.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Wraps a model failure with the model name and call context preserved.
    pub fn inference(
        model: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model: model.into(),
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Creates a model-load error for the given artifact path.
    pub fn model_load(
        path: impl Into<std::path::PathBuf>,
        context: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ModelLoad {
            path: path.into(),
            context: context.into(),
            source,
        }
    }

    /// Creates an unexpected-output error for a model result the service
    /// cannot interpret.
    pub fn unexpected_output(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_preserved() {
        let err = DermError::validation("age must be non-negative");
        assert_eq!(err.to_string(), "validation: age must be non-negative");
    }

    #[test]
    fn inference_error_keeps_source() {
        use std::error::Error;

        let err = DermError::inference(
            "melanoma_tabular",
            "forward pass",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(err.source().is_some());
    }
}
