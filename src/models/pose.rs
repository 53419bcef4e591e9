// Data models for body-pose landmarks and depth classification

use serde::{Deserialize, Serialize};

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A 3D keypoint with confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates, grows downwards
    pub z: f32, // Depth proxy, more negative = closer to the camera
    #[serde(default = "full_confidence", alias = "visibility")]
    pub confidence: f32, // Detection confidence [0, 1]
}

fn full_confidence() -> f32 {
    1.0
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
        }
    }

    /// Horizontal position in the mirrored (displayed) image
    pub fn mirrored_x(&self) -> f32 {
        1.0 - self.x
    }
}

// ==============================================================================
// Tracked Body Landmarks
// ==============================================================================

/// MediaPipe Pose landmark indices for the keypoints the controller reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftWrist = 15,
    RightWrist = 16,
    LeftHip = 23,
    RightHip = 24,
}

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Smallest keypoint list that still contains every tracked landmark
pub const MIN_KEYPOINTS: usize = BodyLandmark::RightHip as usize + 1;

// ==============================================================================
// Landmark Frame
// ==============================================================================

/// The five keypoints the gesture rules need for one video frame.
///
/// A frame is either complete or absent: there is no way to build one with a
/// missing keypoint, so "no detection" is always `Option::None` upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub nose: Keypoint3D,
    pub left_wrist: Keypoint3D,
    pub right_wrist: Keypoint3D,
    pub left_hip: Keypoint3D,
    pub right_hip: Keypoint3D,
}

impl LandmarkFrame {
    /// Pick the tracked landmarks out of a full MediaPipe keypoint list.
    /// Returns `None` when the list is too short to hold all of them.
    pub fn from_keypoints(keypoints: &[Keypoint3D]) -> Option<Self> {
        if keypoints.len() < MIN_KEYPOINTS {
            return None;
        }

        Some(Self {
            nose: keypoints[BodyLandmark::Nose.index()],
            left_wrist: keypoints[BodyLandmark::LeftWrist.index()],
            right_wrist: keypoints[BodyLandmark::RightWrist.index()],
            left_hip: keypoints[BodyLandmark::LeftHip.index()],
            right_hip: keypoints[BodyLandmark::RightHip.index()],
        })
    }

    pub fn nose_mirror(&self) -> f32 {
        self.nose.mirrored_x()
    }

    pub fn left_wrist_mirror(&self) -> f32 {
        self.left_wrist.mirrored_x()
    }

    pub fn right_wrist_mirror(&self) -> f32 {
        self.right_wrist.mirrored_x()
    }

    /// Vertical midpoint of the hips
    pub fn waist_y(&self) -> f32 {
        (self.left_hip.y + self.right_hip.y) / 2.0
    }
}

// ==============================================================================
// Depth Status
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthStatus {
    TooClose,
    Ok,
    TooFar,
}

impl DepthStatus {
    /// Hint shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            DepthStatus::TooClose => "Move back (too close)",
            DepthStatus::Ok => "Position OK",
            DepthStatus::TooFar => "Move closer (too far)",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, DepthStatus::Ok)
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Landmark source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Malformed landmark record on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PoseResult<T> = Result<T, PoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn keypoints_with(overrides: &[(BodyLandmark, Keypoint3D)]) -> Vec<Keypoint3D> {
        let mut keypoints = vec![Keypoint3D::new(0.0, 0.0, 0.0, 1.0); 33];
        for (landmark, keypoint) in overrides {
            keypoints[landmark.index()] = *keypoint;
        }
        keypoints
    }

    #[test]
    fn test_frame_from_full_keypoint_list() {
        let keypoints = keypoints_with(&[
            (BodyLandmark::Nose, Keypoint3D::new(0.5, 0.2, -0.3, 0.9)),
            (BodyLandmark::LeftWrist, Keypoint3D::new(0.7, 0.5, 0.0, 0.9)),
            (BodyLandmark::RightWrist, Keypoint3D::new(0.25, 0.5, 0.0, 0.9)),
            (BodyLandmark::LeftHip, Keypoint3D::new(0.6, 0.8, 0.0, 0.9)),
            (BodyLandmark::RightHip, Keypoint3D::new(0.4, 0.6, 0.0, 0.9)),
        ]);

        let frame = LandmarkFrame::from_keypoints(&keypoints).expect("complete frame");
        assert_eq!(frame.nose.z, -0.3);
        assert_eq!(frame.right_wrist.x, 0.25);
        assert!((frame.nose_mirror() - 0.5).abs() < 1e-6);
        assert!((frame.left_wrist_mirror() - 0.3).abs() < 1e-6);
        assert!((frame.right_wrist_mirror() - 0.75).abs() < 1e-6);
        assert!((frame.waist_y() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_short_keypoint_list_is_no_detection() {
        let keypoints = vec![Keypoint3D::new(0.5, 0.5, 0.0, 1.0); MIN_KEYPOINTS - 1];
        assert!(LandmarkFrame::from_keypoints(&keypoints).is_none());
    }

    #[test]
    fn test_keypoint_accepts_visibility_field() {
        let keypoint: Keypoint3D =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":-0.1,"visibility":0.4}"#).unwrap();
        assert_eq!(keypoint.confidence, 0.4);

        let keypoint: Keypoint3D = serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":-0.1}"#).unwrap();
        assert_eq!(keypoint.confidence, 1.0);
    }

    #[test]
    fn test_depth_status_messages() {
        assert_eq!(DepthStatus::TooClose.message(), "Move back (too close)");
        assert_eq!(DepthStatus::TooFar.message(), "Move closer (too far)");
        assert_eq!(DepthStatus::Ok.message(), "Position OK");
        assert!(DepthStatus::Ok.is_ok());
        assert!(!DepthStatus::TooFar.is_ok());
    }
}
