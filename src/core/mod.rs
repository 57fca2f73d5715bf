//! Core infrastructure: error taxonomy, ONNX Runtime execution, and the
//! load-once inference context.

pub mod context;
pub mod errors;
pub mod inference;

pub use context::{ArtifactConfig, InferenceContext};
pub use errors::{DermError, DermResult};
pub use inference::{OnnxModel, SessionOptions};

/// Initializes tracing with an environment-driven filter.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
