// Data models for control lines, injected input actions and UI events

use serde::{Deserialize, Serialize};

// ==============================================================================
// Control Lines
// ==============================================================================

/// One discrete input channel with press/release state.
///
/// `BothSides` never reaches the input sink; it only remembers that the
/// two-hands-spread click already fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLine {
    Left,
    Right,
    Up,
    Down,
    Space,
    MouseClick,
    BothSides,
}

impl ControlLine {
    pub const COUNT: usize = 7;

    pub const ALL: [ControlLine; ControlLine::COUNT] = [
        ControlLine::Left,
        ControlLine::Right,
        ControlLine::Up,
        ControlLine::Down,
        ControlLine::Space,
        ControlLine::MouseClick,
        ControlLine::BothSides,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Keyboard key driven by this line, if it is a key line
    pub fn key(self) -> Option<Key> {
        match self {
            ControlLine::Left => Some(Key::Left),
            ControlLine::Right => Some(Key::Right),
            ControlLine::Up => Some(Key::Up),
            ControlLine::Down => Some(Key::Down),
            ControlLine::Space => Some(Key::Space),
            ControlLine::MouseClick | ControlLine::BothSides => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::Space => "space",
        }
    }
}

// ==============================================================================
// Modes and Gestures
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Keyboard,
    Mouse,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Keyboard => Mode::Mouse,
            Mode::Mouse => Mode::Keyboard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Keyboard => "keyboard",
            Mode::Mouse => "mouse",
        }
    }
}

/// Gesture label reported for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveGesture {
    #[serde(rename = "MOUSE CLICK")]
    MouseClick,
    #[serde(rename = "LEFT")]
    Left,
    #[serde(rename = "RIGHT")]
    Right,
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
    #[serde(rename = "CLICK HOLD")]
    ClickHold,
}

// ==============================================================================
// Screen Geometry
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

// ==============================================================================
// Injected Input
// ==============================================================================

/// A single action delivered to an input sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InputAction {
    KeyDown { key: Key },
    KeyUp { key: Key },
    PointerDown,
    PointerUp,
    Click { x: i32, y: i32 },
    MoveCursor { x: i32, y: i32 },
}

impl InputAction {
    pub fn to_string(&self) -> String {
        match self {
            InputAction::KeyDown { key } => format!("key_down({})", key.as_str()),
            InputAction::KeyUp { key } => format!("key_up({})", key.as_str()),
            InputAction::PointerDown => "pointer_down".to_string(),
            InputAction::PointerUp => "pointer_up".to_string(),
            InputAction::Click { x, y } => format!("click({}, {})", x, y),
            InputAction::MoveCursor { x, y } => format!("move_cursor({}, {})", x, y),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub timestamp: i64,
    pub action: InputAction,
}

// ==============================================================================
// UI Events
// ==============================================================================

/// User-interface requests coming from outside the gesture pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEvent {
    ToggleHints,
    ToggleMode,
    ToggleHelp,
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_line_indices_are_dense() {
        for (i, line) in ControlLine::ALL.iter().enumerate() {
            assert_eq!(line.index(), i);
        }
    }

    #[test]
    fn test_only_key_lines_map_to_keys() {
        assert_eq!(ControlLine::Space.key(), Some(Key::Space));
        assert_eq!(ControlLine::Left.key(), Some(Key::Left));
        assert_eq!(ControlLine::MouseClick.key(), None);
        assert_eq!(ControlLine::BothSides.key(), None);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::default(), Mode::Keyboard);
        assert_eq!(Mode::Keyboard.toggled(), Mode::Mouse);
        assert_eq!(Mode::Mouse.toggled(), Mode::Keyboard);
    }

    #[test]
    fn test_gesture_labels_serialize_as_display_text() {
        let json = serde_json::to_string(&ActiveGesture::ClickHold).unwrap();
        assert_eq!(json, "\"CLICK HOLD\"");
        let json = serde_json::to_string(&ActiveGesture::MouseClick).unwrap();
        assert_eq!(json, "\"MOUSE CLICK\"");
    }

    #[test]
    fn test_screen_center() {
        assert_eq!(ScreenSize::new(1920, 1080).center(), Point::new(960, 540));
        assert_eq!(ScreenSize::new(801, 601).center(), Point::new(400, 300));
    }

    #[test]
    fn test_ui_event_parsing() {
        let event: UiEvent = serde_json::from_str("\"toggle_mode\"").unwrap();
        assert_eq!(event, UiEvent::ToggleMode);
    }

    #[test]
    fn test_input_action_serialization() {
        let json = serde_json::to_string(&InputAction::KeyDown { key: Key::Up }).unwrap();
        assert_eq!(json, r#"{"action":"key_down","key":"up"}"#);
        assert_eq!(InputAction::PointerUp.to_string(), "pointer_up");
    }
}
