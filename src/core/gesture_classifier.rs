// Gesture rules for keyboard and mouse mode.
// Everything here is a pure function of one landmark frame; press/release
// bookkeeping lives in the input state machine.

use crate::core::config::Config;
use crate::models::input::{ActiveGesture, Point, ScreenSize};
use crate::models::pose::LandmarkFrame;
use serde::Serialize;

/// Thresholds shared by both rule sets, in normalized image units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub deadzone: f32,
    pub up_threshold: f32,
    pub down_threshold: f32,
}

impl GestureThresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            deadzone: config.deadzone,
            up_threshold: config.up_threshold,
            down_threshold: config.down_threshold,
        }
    }

    fn left_out(&self, frame: &LandmarkFrame) -> bool {
        frame.left_wrist_mirror() < frame.nose_mirror() - self.deadzone
    }

    fn right_out(&self, frame: &LandmarkFrame) -> bool {
        frame.right_wrist_mirror() > frame.nose_mirror() + self.deadzone
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ==============================================================================
// Keyboard Mode
// ==============================================================================

/// Gestures active in one keyboard-mode frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardGestures {
    pub both_sides: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyboardGestures {
    pub fn detect(frame: &LandmarkFrame, thresholds: &GestureThresholds) -> Self {
        let left_out = thresholds.left_out(frame);
        let right_out = thresholds.right_out(frame);
        let both_sides = left_out && right_out;

        let up_line = frame.nose.y - thresholds.up_threshold;
        let up = frame.left_wrist.y < up_line || frame.right_wrist.y < up_line;

        let down_line = frame.waist_y() - thresholds.down_threshold;
        let down = frame.left_wrist.y > down_line || frame.right_wrist.y > down_line;

        Self {
            both_sides,
            left: left_out && !both_sides,
            right: right_out && !both_sides,
            up,
            down,
        }
    }

    /// Label for display. The spread click wins outright; otherwise the
    /// last true rule in left, right, up, down order.
    pub fn label(&self) -> Option<ActiveGesture> {
        if self.both_sides {
            return Some(ActiveGesture::MouseClick);
        }

        [
            (self.left, ActiveGesture::Left),
            (self.right, ActiveGesture::Right),
            (self.up, ActiveGesture::Up),
            (self.down, ActiveGesture::Down),
        ]
        .into_iter()
        .filter(|(active, _)| *active)
        .map(|(_, gesture)| gesture)
        .last()
    }
}

// ==============================================================================
// Mouse Mode
// ==============================================================================

/// Gestures active in one mouse-mode frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseGestures {
    /// Where the right hand points on screen, before smoothing
    pub target: Point,
    pub click_hold: bool,
}

impl MouseGestures {
    pub fn detect(frame: &LandmarkFrame, thresholds: &GestureThresholds, screen: ScreenSize) -> Self {
        Self {
            target: cursor_target(frame, screen),
            click_hold: thresholds.left_out(frame),
        }
    }

    pub fn label(&self) -> Option<ActiveGesture> {
        self.click_hold.then_some(ActiveGesture::ClickHold)
    }
}

/// Absolute screen position for the right wrist, mirrored horizontally
pub fn cursor_target(frame: &LandmarkFrame, screen: ScreenSize) -> Point {
    let x = (1.0 - frame.right_wrist.x as f64) * screen.width as f64;
    let y = frame.right_wrist.y as f64 * screen.height as f64;
    Point::new(x.round() as i32, y.round() as i32)
}

/// One step of exponential smoothing from `last` toward `target`.
///
/// `smoothing` in (0, 1]; 1 jumps straight to the target. Results round to
/// the nearest pixel, which can reach but never pass the target.
pub fn smooth_toward(last: Point, target: Point, smoothing: f32) -> Point {
    let step = |from: i32, to: i32| -> i32 {
        let from = from as f64;
        (from + (to as f64 - from) * smoothing as f64).round() as i32
    };
    Point::new(step(last.x, target.x), step(last.y, target.y))
}

// ==============================================================================
// Control Zones
// ==============================================================================

/// Zone boundaries in mirrored, normalized image coordinates for hint overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlZones {
    /// Left hand past this x triggers LEFT (or CLICK HOLD in mouse mode)
    pub left_x: f32,
    /// Right hand past this x triggers RIGHT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_x: Option<f32>,
    /// A wrist above this y triggers UP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_y: Option<f32>,
    /// A wrist below this y triggers DOWN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_y: Option<f32>,
}

impl ControlZones {
    pub fn keyboard(frame: &LandmarkFrame, thresholds: &GestureThresholds) -> Self {
        let nose_mirror = frame.nose_mirror();
        Self {
            left_x: nose_mirror - thresholds.deadzone,
            right_x: Some(nose_mirror + thresholds.deadzone),
            up_y: Some(frame.nose.y - thresholds.up_threshold),
            down_y: Some(frame.waist_y() - thresholds.down_threshold),
        }
    }

    pub fn mouse(frame: &LandmarkFrame, thresholds: &GestureThresholds) -> Self {
        Self {
            left_x: frame.nose_mirror() - thresholds.deadzone,
            right_x: None,
            up_y: None,
            down_y: None,
        }
    }
}
