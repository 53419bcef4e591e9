// Pose estimation platform integration
// Landmark sources feed detections and UI events into the frame loop

use crate::models::input::UiEvent;
use crate::models::pose::{Keypoint3D, LandmarkFrame, PoseResult};
use serde::Deserialize;

pub mod background;
pub mod json_source;
pub use background::BackgroundSource;
pub use json_source::JsonLinesSource;

#[cfg(feature = "ml-pyo3")]
pub mod mediapipe_bridge;
#[cfg(feature = "ml-pyo3")]
pub use mediapipe_bridge::MediaPipeBridge;

/// One step of input for the frame loop
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// Result of running the pose model on one video frame.
    /// `None` means nobody was detected in that frame.
    Detection(Option<LandmarkFrame>),
    Ui(UiEvent),
}

/// Produces landmark detections, one video frame at a time.
///
/// Calls block until the next frame is available. `Ok(None)` means the
/// stream has ended; an `Err` means the source is unusable and the caller
/// should stop.
pub trait LandmarkSource {
    fn poll(&mut self) -> PoseResult<Option<SourceEvent>>;

    fn describe(&self) -> String;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn poll(&mut self) -> PoseResult<Option<SourceEvent>> {
        (**self).poll()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ==============================================================================
// Wire Records
// ==============================================================================

/// JSON record emitted by a pose estimator process, one per line
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum WireRecord {
    Pose { keypoints: Option<Vec<Keypoint3D>> },
    Ui { event: UiEvent },
}

impl WireRecord {
    pub(crate) fn into_event(self) -> SourceEvent {
        match self {
            WireRecord::Pose { keypoints: None } => SourceEvent::Detection(None),
            WireRecord::Pose {
                keypoints: Some(keypoints),
            } => {
                let frame = LandmarkFrame::from_keypoints(&keypoints);
                if frame.is_none() {
                    tracing::warn!(
                        "Pose record has only {} keypoints, treating frame as no detection",
                        keypoints.len()
                    );
                }
                SourceEvent::Detection(frame)
            }
            WireRecord::Ui { event } => SourceEvent::Ui(event),
        }
    }
}
