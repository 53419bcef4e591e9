use crate::core::config::Config;
use crate::core::depth_gate::DepthGate;
use crate::core::gesture_classifier::{
    smooth_toward, ControlZones, GestureThresholds, KeyboardGestures, MouseGestures,
};
use crate::core::input_state::{ControllerState, InputStateMachine};
use crate::core::mode_controller::{LoopControl, ModeController};
use crate::models::input::{ActiveGesture, ControlLine, Mode, Point, ScreenSize, UiEvent};
use crate::models::pose::{DepthStatus, LandmarkFrame};
use crate::platform::input::InputSink;
use serde::Serialize;
use tracing::{debug, info, warn};

// ==============================================================================
// Frame Report
// ==============================================================================

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub mode: Mode,
    pub detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<DepthStatus>,
    pub hint: &'static str,
    pub gesture: Option<ActiveGesture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Point>,
    pub pressed: Vec<ControlLine>,
    pub show_hints: bool,
    pub show_help: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<ControlZones>,
}

// ==============================================================================
// Gesture Controller
// ==============================================================================

/// Per-frame pipeline: depth gate, gesture rules for the active mode, and the
/// input state machine in front of the sink.
pub struct GestureController<S: InputSink> {
    thresholds: GestureThresholds,
    depth_gate: DepthGate,
    smoothing: f32,
    screen: ScreenSize,
    machine: InputStateMachine<S>,
    modes: ModeController,
    frames: u64,
    last_depth: Option<DepthStatus>,
}

impl<S: InputSink> GestureController<S> {
    pub fn new(config: &Config, sink: S) -> Self {
        let screen = config.resolve_screen(sink.screen_size());
        info!(
            "Gesture controller ready: sink={}, screen={}x{}",
            sink.name(),
            screen.width,
            screen.height
        );

        Self {
            thresholds: GestureThresholds::from_config(config),
            depth_gate: DepthGate::from_config(config),
            smoothing: config.mouse_smoothing,
            screen,
            machine: InputStateMachine::new(sink),
            modes: ModeController::new(config.show_hints),
            frames: 0,
            last_depth: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn state(&self) -> &ControllerState {
        self.machine.state()
    }

    pub fn sink(&self) -> &S {
        self.machine.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.machine.sink_mut()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.modes.switch_to(mode, &mut self.machine);
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) -> LoopControl {
        self.modes.handle_event(event, &mut self.machine)
    }

    /// Release every held line. Must run before the process stops driving input.
    pub fn release_all(&mut self) -> usize {
        self.machine.release_all()
    }

    /// Process one frame's detection result. `None` means nobody was
    /// detected; held lines stay as they are until a real detection arrives.
    pub fn process_frame(&mut self, detection: Option<&LandmarkFrame>) -> FrameReport {
        self.frames += 1;

        let mut report = FrameReport {
            frame: self.frames,
            mode: self.modes.mode(),
            detected: detection.is_some(),
            depth: None,
            hint: "",
            gesture: None,
            cursor: None,
            pressed: Vec::new(),
            show_hints: self.modes.show_hints(),
            show_help: self.modes.show_help(),
            zones: None,
        };

        if let Some(frame) = detection {
            if self.modes.show_hints() {
                report.zones = Some(match self.modes.mode() {
                    Mode::Keyboard => ControlZones::keyboard(frame, &self.thresholds),
                    Mode::Mouse => ControlZones::mouse(frame, &self.thresholds),
                });
            }

            let (status, hint) = self.depth_gate.classify(frame.nose.z);
            self.note_depth(status, frame.nose.z);
            report.depth = Some(status);
            report.hint = hint;

            if status.is_ok() {
                match self.modes.mode() {
                    Mode::Keyboard => {
                        report.gesture = self.handle_keyboard_mode(frame);
                    }
                    Mode::Mouse => {
                        let (gesture, cursor) = self.handle_mouse_mode(frame);
                        report.gesture = gesture;
                        report.cursor = Some(cursor);
                    }
                }
            } else {
                // Out of range means no input at all, not "keep the last input"
                self.machine.release_all();
            }
        }

        report.pressed = self.machine.state().asserted();
        report
    }

    fn handle_keyboard_mode(&mut self, frame: &LandmarkFrame) -> Option<ActiveGesture> {
        let gestures = KeyboardGestures::detect(frame, &self.thresholds);

        if gestures.both_sides {
            // Left/right stay untouched while both hands are spread
            if self.machine.set_line(ControlLine::BothSides, true) {
                self.machine.click_at(self.screen.center());
                info!("Mouse click (both hands spread)");
            }
        } else {
            self.machine.set_line(ControlLine::BothSides, false);
            self.machine.set_line(ControlLine::Left, gestures.left);
            self.machine.set_line(ControlLine::Right, gestures.right);
        }

        // Jump is bound to both up and space
        self.machine.set_line(ControlLine::Up, gestures.up);
        self.machine.set_line(ControlLine::Space, gestures.up);
        self.machine.set_line(ControlLine::Down, gestures.down);

        gestures.label()
    }

    fn handle_mouse_mode(&mut self, frame: &LandmarkFrame) -> (Option<ActiveGesture>, Point) {
        let gestures = MouseGestures::detect(frame, &self.thresholds, self.screen);

        let last = self
            .machine
            .state()
            .last_cursor
            .unwrap_or_else(|| self.screen.center());
        let cursor = smooth_toward(last, gestures.target, self.smoothing);
        self.machine.move_cursor(cursor);

        self.machine.set_line(ControlLine::MouseClick, gestures.click_hold);

        (gestures.label(), cursor)
    }

    fn note_depth(&mut self, status: DepthStatus, nose_z: f32) {
        if self.last_depth == Some(status) {
            return;
        }

        match status {
            DepthStatus::Ok => debug!("User in range (nose z {:.2})", nose_z),
            _ => warn!("{} (nose z {:.2}), releasing all controls", status.message(), nose_z),
        }
        self.last_depth = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gesture_classifier::tests::frame_mirrored;
    use crate::models::input::{InputAction, Key};
    use crate::platform::input::RecordingSink;

    fn controller() -> GestureController<RecordingSink> {
        GestureController::new(
            &Config::default(),
            RecordingSink::with_screen(ScreenSize::new(800, 600)),
        )
    }

    fn neutral() -> LandmarkFrame {
        frame_mirrored(0.5, 0.45, 0.55)
    }

    fn spread() -> LandmarkFrame {
        frame_mirrored(0.5, 0.1, 0.9)
    }

    fn hands_up() -> LandmarkFrame {
        let mut frame = neutral();
        frame.left_wrist.y = 0.1;
        frame.right_wrist.y = 0.1;
        frame
    }

    #[test]
    fn test_spread_clicks_once_per_hold() {
        let mut c = controller();
        for _ in 0..10 {
            let report = c.process_frame(Some(&spread()));
            assert_eq!(report.gesture, Some(ActiveGesture::MouseClick));
        }
        assert_eq!(c.sink().actions(), vec![InputAction::Click { x: 400, y: 300 }]);

        // Lowering the arms and spreading again clicks again
        c.process_frame(Some(&neutral()));
        c.process_frame(Some(&spread()));
        assert_eq!(c.sink().count(InputAction::Click { x: 400, y: 300 }), 2);
    }

    #[test]
    fn test_spread_leaves_left_right_alone() {
        let mut c = controller();

        c.process_frame(Some(&frame_mirrored(0.5, 0.1, 0.55)));
        assert!(c.state().is_asserted(ControlLine::Left));
        c.sink_mut().clear();

        // Right hand joins: click fires, left is neither pressed nor released
        c.process_frame(Some(&spread()));
        assert_eq!(c.sink().actions(), vec![InputAction::Click { x: 400, y: 300 }]);
        assert!(c.state().is_asserted(ControlLine::Left));
        assert!(!c.state().is_asserted(ControlLine::Right));

        // Dropping the right hand resumes normal left/right handling
        c.sink_mut().clear();
        c.process_frame(Some(&neutral()));
        assert_eq!(c.sink().actions(), vec![InputAction::KeyUp { key: Key::Left }]);
    }

    #[test]
    fn test_up_drives_up_and_space_together() {
        let mut c = controller();

        let report = c.process_frame(Some(&hands_up()));
        assert_eq!(report.gesture, Some(ActiveGesture::Up));
        assert_eq!(report.pressed, vec![ControlLine::Up, ControlLine::Space]);
        c.process_frame(Some(&hands_up()));
        c.process_frame(Some(&neutral()));

        assert_eq!(
            c.sink().actions(),
            vec![
                InputAction::KeyDown { key: Key::Up },
                InputAction::KeyDown { key: Key::Space },
                InputAction::KeyUp { key: Key::Up },
                InputAction::KeyUp { key: Key::Space },
            ]
        );
    }

    #[test]
    fn test_up_still_fires_during_spread() {
        let mut c = controller();
        let mut frame = spread();
        frame.left_wrist.y = 0.1;

        c.process_frame(Some(&frame));
        assert!(c.state().is_asserted(ControlLine::Up));
        assert!(c.state().is_asserted(ControlLine::Space));
        assert!(c.state().is_asserted(ControlLine::BothSides));
    }

    #[test]
    fn test_bad_depth_releases_everything() {
        let mut c = controller();
        c.process_frame(Some(&hands_up()));
        c.sink_mut().clear();

        let mut too_close = hands_up();
        too_close.nose.z = -0.9;
        let report = c.process_frame(Some(&too_close));

        assert_eq!(report.depth, Some(DepthStatus::TooClose));
        assert_eq!(report.hint, "Move back (too close)");
        assert_eq!(report.gesture, None);
        assert!(report.pressed.is_empty());
        assert_eq!(
            c.sink().actions(),
            vec![
                InputAction::KeyUp { key: Key::Up },
                InputAction::KeyUp { key: Key::Space },
            ]
        );

        // Still too far away: nothing else to release
        let mut too_far = hands_up();
        too_far.nose.z = 0.5;
        assert_eq!(c.process_frame(Some(&too_far)).depth, Some(DepthStatus::TooFar));
        assert_eq!(c.sink().actions().len(), 2);
    }

    #[test]
    fn test_no_detection_holds_state() {
        let mut c = controller();
        c.process_frame(Some(&frame_mirrored(0.5, 0.2, 0.55)));
        c.sink_mut().clear();

        let report = c.process_frame(None);
        assert!(!report.detected);
        assert_eq!(report.hint, "");
        assert_eq!(report.pressed, vec![ControlLine::Left]);
        assert!(c.sink().actions().is_empty());
    }

    #[test]
    fn test_mouse_mode_smooths_from_screen_center() {
        let mut c = controller();
        c.set_mode(Mode::Mouse);

        let mut frame = neutral();
        frame.right_wrist.x = 0.0;
        frame.right_wrist.y = 1.0;

        let first = c.process_frame(Some(&frame));
        assert_eq!(first.cursor, Some(Point::new(680, 510)));
        let second = c.process_frame(Some(&frame));
        assert_eq!(second.cursor, Some(Point::new(764, 573)));

        assert_eq!(
            c.sink().actions(),
            vec![
                InputAction::MoveCursor { x: 680, y: 510 },
                InputAction::MoveCursor { x: 764, y: 573 },
            ]
        );
    }

    #[test]
    fn test_mouse_mode_moves_every_frame() {
        let mut c = controller();
        c.set_mode(Mode::Mouse);

        let mut frame = neutral();
        frame.right_wrist.x = 0.5;
        frame.right_wrist.y = 0.5;
        for _ in 0..3 {
            c.process_frame(Some(&frame));
        }

        // Already at the target, still moved each frame
        assert_eq!(c.sink().count(InputAction::MoveCursor { x: 400, y: 300 }), 3);
    }

    #[test]
    fn test_mouse_click_hold_and_mode_switch() {
        let mut c = controller();
        c.set_mode(Mode::Mouse);

        let hold = frame_mirrored(0.5, 0.1, 0.55);
        let report = c.process_frame(Some(&hold));
        assert_eq!(report.gesture, Some(ActiveGesture::ClickHold));
        c.process_frame(Some(&hold));
        assert_eq!(c.sink().count(InputAction::PointerDown), 1);

        c.sink_mut().clear();
        assert_eq!(c.handle_ui_event(UiEvent::ToggleMode), LoopControl::Continue);
        assert_eq!(c.mode(), Mode::Keyboard);
        assert_eq!(c.sink().actions(), vec![InputAction::PointerUp]);
        assert!(!c.state().is_asserted(ControlLine::MouseClick));
    }

    #[test]
    fn test_cursor_position_survives_mode_round_trip() {
        let mut c = controller();
        c.set_mode(Mode::Mouse);

        let mut frame = neutral();
        frame.right_wrist.x = 0.0;
        frame.right_wrist.y = 1.0;
        c.process_frame(Some(&frame));

        c.set_mode(Mode::Keyboard);
        c.set_mode(Mode::Mouse);
        let report = c.process_frame(Some(&frame));
        assert_eq!(report.cursor, Some(Point::new(764, 573)));
    }

    #[test]
    fn test_press_release_balance_over_noisy_sequence() {
        let mut c = controller();
        let frames = [
            frame_mirrored(0.5, 0.29, 0.55),
            frame_mirrored(0.5, 0.31, 0.55),
            frame_mirrored(0.5, 0.29, 0.55),
            frame_mirrored(0.5, 0.28, 0.55),
            frame_mirrored(0.5, 0.35, 0.55),
            frame_mirrored(0.5, 0.1, 0.9),
            frame_mirrored(0.5, 0.2, 0.55),
        ];
        for frame in &frames {
            c.process_frame(Some(frame));
        }
        c.release_all();

        let downs = c.sink().count(InputAction::KeyDown { key: Key::Left });
        let ups = c.sink().count(InputAction::KeyUp { key: Key::Left });
        assert_eq!(downs, 3);
        assert_eq!(downs, ups);
        assert!(!c.state().any_asserted());
    }

    #[test]
    fn test_zones_follow_hint_toggle() {
        let mut c = controller();
        assert!(c.process_frame(Some(&neutral())).zones.is_some());

        c.handle_ui_event(UiEvent::ToggleHints);
        let report = c.process_frame(Some(&neutral()));
        assert!(!report.show_hints);
        assert!(report.zones.is_none());
    }

    #[test]
    fn test_report_serializes() {
        let mut c = controller();
        let report = c.process_frame(Some(&hands_up()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "keyboard");
        assert_eq!(json["depth"], "ok");
        assert_eq!(json["gesture"], "UP");
        assert_eq!(json["pressed"], serde_json::json!(["up", "space"]));
    }
}
