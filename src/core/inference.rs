//! ONNX Runtime execution for the two serving models.
//!
//! Both the tabular melanoma classifier and the lesion-type CNN are executed
//! through the same wrapper: a small pool of sessions rotated round-robin so
//! concurrent callers never contend on a single session lock, with typed
//! entry points for 2-D feature input and 4-D NHWC image input. Both entry
//! points return a `[batch, classes]` probability tensor.

use crate::core::errors::{DermError, DermResult};
use ndarray::{Array2, Array4, ArrayView2, ArrayViewD};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Session construction options applied to every session in the pool.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SessionOptions {
    /// Number of sessions held in the pool; callers rotate across them.
    pub pool_size: Option<usize>,
    /// Number of threads used to parallelize execution within nodes.
    pub intra_threads: Option<usize>,
}

/// A loaded ONNX model with a round-robin session pool.
pub struct OnnxModel {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OnnxModel {
    /// Loads a model from disk, building one session per pool slot.
    ///
    /// The primary input and output tensor names are discovered from the
    /// model's own signature, so artifacts exported from different training
    /// stacks (`float_input`, `input_1`, ...) load without configuration.
    pub fn load(model_path: impl AsRef<Path>, options: &SessionOptions) -> DermResult<Self> {
        let path = model_path.as_ref();
        let pool_size = options.pool_size.unwrap_or(1).max(1);

        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let mut builder = Session::builder()?.with_log_level(LogLevel::Error)?;
            if let Some(threads) = options.intra_threads {
                builder = builder.with_intra_threads(threads)?;
            }
            let session = builder.commit_from_file(path).map_err(|e| {
                DermError::model_load(
                    path,
                    "failed to create ONNX session",
                    Some(Box::new(e)),
                )
            })?;
            sessions.push(Mutex::new(session));
        }

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        let (input_name, output_name) = {
            let session = sessions[0].lock().map_err(|_| {
                DermError::model_load(path, "session lock poisoned during load", None)
            })?;
            let input = session.inputs.first().ok_or_else(|| {
                DermError::model_load(path, "model declares no inputs", None)
            })?;
            let output = session.outputs.first().ok_or_else(|| {
                DermError::model_load(path, "model declares no outputs", None)
            })?;
            (input.name.clone(), output.name.clone())
        };

        tracing::info!(
            model = %model_name,
            path = %path.display(),
            pool_size,
            input = %input_name,
            output = %output_name,
            "loaded ONNX model"
        );

        Ok(Self {
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Returns the model name derived from the artifact file stem.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the model path this instance was loaded from.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Runs a forward pass on a `[batch, features]` tensor and returns the
    /// `[batch, classes]` probability output.
    pub fn probabilities_from_features(&self, x: &Array2<f32>) -> DermResult<Array2<f32>> {
        self.run_to_probabilities(x.view().into_dyn(), x.shape()[0])
    }

    /// Runs a forward pass on a `[batch, height, width, channels]` tensor and
    /// returns the `[batch, classes]` probability output.
    pub fn probabilities_from_image(&self, x: &Array4<f32>) -> DermResult<Array2<f32>> {
        self.run_to_probabilities(x.view().into_dyn(), x.shape()[0])
    }

    fn run_to_probabilities(
        &self,
        input: ArrayViewD<'_, f32>,
        batch_size: usize,
    ) -> DermResult<Array2<f32>> {
        let input_shape = input.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(input).map_err(|e| {
            DermError::inference(
                &self.model_name,
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        // Rotate across the pool; each session is exclusively held for the
        // duration of one forward pass.
        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session = self.sessions[idx].lock().map_err(|_| {
            DermError::unavailable(format!(
                "session {idx}/{} for model '{}' is poisoned",
                self.sessions.len(),
                self.model_name
            ))
        })?;

        let outputs = session.run(inputs).map_err(|e| {
            DermError::inference(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DermError::inference(
                    &self.model_name,
                    format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(DermError::unexpected_output(
                "a 2-D [batch, classes] tensor",
                format!("{}-D tensor with shape {output_shape:?}", output_shape.len()),
            ));
        }

        let classes = output_shape[1] as usize;
        let expected_len = batch_size * classes;
        if output_data.len() != expected_len {
            return Err(DermError::unexpected_output(
                format!("{expected_len} values for shape [{batch_size}, {classes}]"),
                format!("{} values", output_data.len()),
            ));
        }

        let view = ArrayView2::from_shape((batch_size, classes), output_data)
            .map_err(DermError::Tensor)?;
        Ok(view.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_fails_for_missing_artifact() {
        let result = OnnxModel::load("no/such/model.onnx", &SessionOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn load_respects_pool_size_before_failing() {
        let options = SessionOptions {
            pool_size: Some(3),
            intra_threads: None,
        };
        let result = OnnxModel::load("no/such/model.onnx", &options);
        assert!(result.is_err());
    }
}
