use crate::models::input::{ControlLine, Point};
use crate::platform::input::InputSink;
use tracing::debug;

// ==============================================================================
// Controller State
// ==============================================================================

/// Pressed state of every control line plus the last cursor position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    lines: [bool; ControlLine::COUNT],
    /// Unset until the first mouse-mode frame
    pub last_cursor: Option<Point>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_asserted(&self, line: ControlLine) -> bool {
        self.lines[line.index()]
    }

    /// Lines currently asserted, in declaration order
    pub fn asserted(&self) -> Vec<ControlLine> {
        ControlLine::ALL
            .into_iter()
            .filter(|line| self.is_asserted(*line))
            .collect()
    }

    pub fn any_asserted(&self) -> bool {
        self.lines.iter().any(|pressed| *pressed)
    }

    fn set(&mut self, line: ControlLine, asserted: bool) {
        self.lines[line.index()] = asserted;
    }
}

// ==============================================================================
// Input State Machine
// ==============================================================================

/// Debounces per-frame gesture booleans into clean press/release pairs.
///
/// The sink only ever sees a press on a false→true edge and a release on a
/// true→false edge, so holding a gesture never repeats a press.
pub struct InputStateMachine<S: InputSink> {
    state: ControllerState,
    sink: S,
}

impl<S: InputSink> InputStateMachine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: ControllerState::new(),
            sink,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Drive `line` to `asserted`. Returns true when the line changed state.
    pub fn set_line(&mut self, line: ControlLine, asserted: bool) -> bool {
        if self.state.is_asserted(line) == asserted {
            return false;
        }

        if asserted {
            self.press(line);
        } else {
            self.release(line);
        }
        self.state.set(line, asserted);
        true
    }

    /// Release `line` if it is held
    pub fn release_line(&mut self, line: ControlLine) -> bool {
        self.set_line(line, false)
    }

    /// Release every asserted line. Returns how many lines were released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for line in ControlLine::ALL {
            if self.release_line(line) {
                released += 1;
            }
        }

        if released > 0 {
            debug!("Released {} control lines", released);
        }
        released
    }

    /// Single click, independent of any line state
    pub fn click_at(&mut self, point: Point) {
        self.sink.click_at(point.x, point.y);
    }

    /// Move the cursor and remember where it went
    pub fn move_cursor(&mut self, point: Point) {
        self.sink.move_cursor(point.x, point.y);
        self.state.last_cursor = Some(point);
    }

    fn press(&mut self, line: ControlLine) {
        match line {
            ControlLine::MouseClick => self.sink.pointer_down(),
            ControlLine::BothSides => {}
            _ => {
                if let Some(key) = line.key() {
                    self.sink.press_key(key);
                }
            }
        }
    }

    fn release(&mut self, line: ControlLine) {
        match line {
            ControlLine::MouseClick => self.sink.pointer_up(),
            ControlLine::BothSides => {}
            _ => {
                if let Some(key) = line.key() {
                    self.sink.release_key(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::input::{InputAction, Key};
    use crate::platform::input::RecordingSink;

    fn machine() -> InputStateMachine<RecordingSink> {
        InputStateMachine::new(RecordingSink::new())
    }

    #[test]
    fn test_press_fires_once_while_held() {
        let mut m = machine();
        assert!(m.set_line(ControlLine::Left, true));
        for _ in 0..5 {
            assert!(!m.set_line(ControlLine::Left, true));
        }
        assert!(m.set_line(ControlLine::Left, false));
        assert!(!m.set_line(ControlLine::Left, false));

        assert_eq!(
            m.sink().actions(),
            vec![
                InputAction::KeyDown { key: Key::Left },
                InputAction::KeyUp { key: Key::Left },
            ]
        );
    }

    #[test]
    fn test_presses_match_rising_edges() {
        let mut m = machine();
        let pattern = [true, true, false, true, false, false, true, true, true, false];

        let mut rising = 0;
        let mut falling = 0;
        let mut previous = false;
        for asserted in pattern {
            if asserted && !previous {
                rising += 1;
            }
            if !asserted && previous {
                falling += 1;
            }
            previous = asserted;
            m.set_line(ControlLine::Down, asserted);
        }

        assert_eq!(m.sink().count(InputAction::KeyDown { key: Key::Down }), rising);
        assert_eq!(m.sink().count(InputAction::KeyUp { key: Key::Down }), falling);
    }

    #[test]
    fn test_mouse_click_uses_pointer_button() {
        let mut m = machine();
        m.set_line(ControlLine::MouseClick, true);
        m.set_line(ControlLine::MouseClick, false);
        assert_eq!(
            m.sink().actions(),
            vec![InputAction::PointerDown, InputAction::PointerUp]
        );
    }

    #[test]
    fn test_both_sides_never_reaches_sink() {
        let mut m = machine();
        assert!(m.set_line(ControlLine::BothSides, true));
        assert!(m.state().is_asserted(ControlLine::BothSides));
        assert_eq!(m.release_all(), 1);
        assert!(m.sink().actions().is_empty());
    }

    #[test]
    fn test_release_all_clears_every_line() {
        let mut m = machine();
        m.set_line(ControlLine::Up, true);
        m.set_line(ControlLine::Space, true);
        m.set_line(ControlLine::MouseClick, true);
        m.set_line(ControlLine::BothSides, true);
        m.sink_mut().clear();

        assert_eq!(m.release_all(), 4);
        assert!(!m.state().any_asserted());
        assert_eq!(
            m.sink().actions(),
            vec![
                InputAction::KeyUp { key: Key::Up },
                InputAction::KeyUp { key: Key::Space },
                InputAction::PointerUp,
            ]
        );

        // Nothing left to release
        assert_eq!(m.release_all(), 0);
        assert_eq!(m.sink().actions().len(), 3);
    }

    #[test]
    fn test_move_cursor_tracks_position() {
        let mut m = machine();
        assert_eq!(m.state().last_cursor, None);
        m.move_cursor(Point::new(12, 34));
        assert_eq!(m.state().last_cursor, Some(Point::new(12, 34)));
        assert_eq!(m.sink().actions(), vec![InputAction::MoveCursor { x: 12, y: 34 }]);
    }

    #[test]
    fn test_asserted_lists_held_lines() {
        let mut m = machine();
        m.set_line(ControlLine::Right, true);
        m.set_line(ControlLine::Down, true);
        assert_eq!(m.state().asserted(), vec![ControlLine::Right, ControlLine::Down]);
    }
}
