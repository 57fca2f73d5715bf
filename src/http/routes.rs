//! Request handlers for the tabular prediction contract.

use crate::core::errors::DermError;
use crate::http::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of a successful `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub diagnostico: String,
    pub probabilidade_melanoma: f32,
}

/// Liveness and usage information; no side effects.
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Bem-vindo à API de Diagnóstico. Use o endpoint /predict para fazer uma previsão."
            .to_string(),
    })
}

/// Predicts melanoma risk from a schema-keyed feature payload.
///
/// The body must contain exactly the trained schema's feature names: `age`
/// as a number and every indicator as 0 or 1.
pub async fn predict(
    State(state): State<AppState>,
    Json(features): Json<HashMap<String, f64>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let context = state.context().ok_or_else(|| {
        DermError::unavailable("model or column schema failed to load at startup")
    })?;

    let result = context.tabular().predict_features(&features)?;
    Ok(Json(PredictResponse {
        diagnostico: result.diagnosis.wire_label().to_string(),
        probabilidade_melanoma: result.probability,
    }))
}
