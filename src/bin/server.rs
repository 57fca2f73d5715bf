//! Inference-serving HTTP server.
//!
//! Loads the serving artifacts once at startup and serves the tabular
//! prediction contract. A failed artifact load is logged and the server
//! still binds, answering 503 until the process is restarted with the
//! artifacts in place.
//!
//! Usage:
//! ```text
//! derm-screen-server \
//!     --tabular-model saved_models/melanoma.onnx \
//!     --column-schema saved_models/model_columns.json \
//!     --image-model saved_models/lesion_classifier.onnx \
//!     --bind 127.0.0.1:8000
//! ```

use clap::Parser;
use derm_screen::core::context::{ArtifactConfig, InferenceContext};
use derm_screen::core::inference::SessionOptions;
use derm_screen::core::init_tracing;
use derm_screen::http::{AppState, router};
use derm_screen::processors::features::SchemaDriftPolicy;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Command-line arguments for the inference server.
#[derive(Parser)]
#[command(name = "derm-screen-server")]
#[command(about = "Skin-lesion inference server: tabular melanoma risk over HTTP")]
struct Args {
    /// Path to the tabular melanoma model artifact.
    #[arg(long, default_value = "saved_models/melanoma.onnx")]
    tabular_model: PathBuf,

    /// Path to the column-schema artifact (JSON array of names).
    #[arg(long, default_value = "saved_models/model_columns.json")]
    column_schema: PathBuf,

    /// Path to the lesion-type image classifier artifact.
    #[arg(long, default_value = "saved_models/lesion_classifier.onnx")]
    image_model: PathBuf,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Fail requests whose derived columns are missing from the schema
    /// instead of leaving the indicators at 0.
    #[arg(long)]
    strict_schema: bool,

    /// Number of ONNX sessions per model for concurrent callers.
    #[arg(long)]
    session_pool_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let config = ArtifactConfig {
        tabular_model: args.tabular_model,
        column_schema: args.column_schema,
        image_model: args.image_model,
        session: SessionOptions {
            pool_size: args.session_pool_size,
            intra_threads: None,
        },
        drift_policy: if args.strict_schema {
            SchemaDriftPolicy::Reject
        } else {
            SchemaDriftPolicy::Ignore
        },
    };

    let context = match InferenceContext::load(&config) {
        Ok(context) => Some(Arc::new(context)),
        Err(e) => {
            tracing::error!(error = %e, "artifact load failed; serving 503 until restart");
            None
        }
    };

    let app = router(AppState::new(context)).layer(CorsLayer::permissive());

    tracing::info!(bind = %args.bind, "listening");
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
