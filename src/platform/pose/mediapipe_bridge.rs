// MediaPipe integration bridge
// Drives the Python MediaPipe Pose solution through PyO3. The Python side owns
// the camera and the model; each call returns one frame's landmarks as JSON.

use super::{LandmarkSource, SourceEvent, WireRecord};
use crate::core::config::Config;
use crate::models::pose::{PoseError, PoseResult};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing::info;

/// Python module expected on `sys.path`
const INFERENCE_MODULE: &str = "mediapipe_inference";

pub struct MediaPipeBridge {
    inference_module: PyObject,
    camera_index: u32,
    frames: u64,
}

impl MediaPipeBridge {
    pub fn new(config: &Config) -> PoseResult<Self> {
        Python::with_gil(|py| {
            let sys = py
                .import_bound("sys")
                .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to import sys: {}", e)))?;

            let python_dir = std::env::current_dir()
                .map_err(|e| PoseError::ModelLoadFailed(format!("No working directory: {}", e)))?
                .join("python");

            sys.getattr("path")
                .and_then(|path| path.call_method1("insert", (0, python_dir.to_string_lossy().to_string())))
                .map_err(|e| {
                    PoseError::ModelLoadFailed(format!("Failed to add python dir to path: {}", e))
                })?;

            let module = py.import_bound(INFERENCE_MODULE).map_err(|e| {
                PoseError::ModelLoadFailed(format!(
                    "Failed to import {}: {}. Make sure the Python dependencies are installed (pip install mediapipe opencv-python)",
                    INFERENCE_MODULE, e
                ))
            })?;

            let kwargs = PyDict::new_bound(py);
            kwargs
                .set_item("camera_index", config.camera_index)
                .and_then(|_| kwargs.set_item("min_detection_confidence", config.min_detection_confidence))
                .and_then(|_| kwargs.set_item("min_tracking_confidence", config.min_tracking_confidence))
                .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to build arguments: {}", e)))?;

            module
                .getattr("initialize")
                .and_then(|init| init.call((), Some(&kwargs)))
                .map_err(|e| {
                    PoseError::SourceUnavailable(format!("Camera or model initialization failed: {}", e))
                })?;

            info!(
                "MediaPipe pose initialized (camera {}, detection {:.2}, tracking {:.2})",
                config.camera_index, config.min_detection_confidence, config.min_tracking_confidence
            );

            Ok(Self {
                inference_module: module.unbind().into(),
                camera_index: config.camera_index,
                frames: 0,
            })
        })
    }
}

impl LandmarkSource for MediaPipeBridge {
    fn poll(&mut self) -> PoseResult<Option<SourceEvent>> {
        let json: Option<String> = Python::with_gil(|py| {
            let module = self.inference_module.bind(py);
            module
                .getattr("next_landmarks")
                .and_then(|f| f.call0())
                .and_then(|result| result.extract::<Option<String>>())
                .map_err(|e| PoseError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))
        })?;

        // The Python side returns None once the camera stops delivering frames
        let Some(json) = json else {
            info!("Camera stream ended after {} frames", self.frames);
            return Ok(None);
        };
        self.frames += 1;

        let record: WireRecord = serde_json::from_str(&json).map_err(|e| PoseError::Parse {
            line: self.frames as usize,
            message: e.to_string(),
        })?;

        Ok(Some(record.into_event()))
    }

    fn describe(&self) -> String {
        format!("mediapipe (camera {})", self.camera_index)
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        Python::with_gil(|py| {
            let module = self.inference_module.bind(py);
            if let Err(e) = module.getattr("shutdown").and_then(|f| f.call0()) {
                tracing::warn!("MediaPipe shutdown failed: {}", e);
            }
        });
    }
}
