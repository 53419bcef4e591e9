use super::InputSink;
use crate::models::input::{InputAction, InputEvent, Key, ScreenSize};
use std::collections::VecDeque;
use tracing::debug;

/// Most recent actions kept by a recording sink
pub const DEFAULT_CAPACITY: usize = 4096;

/// Sink that injects nothing and keeps a bounded, ordered log of the most
/// recent actions it was asked to perform. Backs `--dry-run` and the
/// controller tests.
#[derive(Debug)]
pub struct RecordingSink {
    events: VecDeque<InputEvent>,
    capacity: usize,
    recorded: u64,
    screen: Option<ScreenSize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            recorded: 0,
            screen: None,
        }
    }

    /// Recording sink that reports a fixed display size
    pub fn with_screen(screen: ScreenSize) -> Self {
        Self {
            screen: Some(screen),
            ..Self::new()
        }
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn actions(&self) -> Vec<InputAction> {
        self.events.iter().map(|e| e.action).collect()
    }

    /// Number of retained actions equal to `action`
    pub fn count(&self, action: InputAction) -> usize {
        self.events.iter().filter(|e| e.action == action).count()
    }

    /// Every action seen since creation, including ones no longer retained
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, action: InputAction) {
        debug!("input: {}", action.to_string());
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(InputEvent {
            timestamp: chrono::Utc::now().timestamp_millis(),
            action,
        });
        self.recorded += 1;
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSink for RecordingSink {
    fn press_key(&mut self, key: Key) {
        self.record(InputAction::KeyDown { key });
    }

    fn release_key(&mut self, key: Key) {
        self.record(InputAction::KeyUp { key });
    }

    fn pointer_down(&mut self) {
        self.record(InputAction::PointerDown);
    }

    fn pointer_up(&mut self) {
        self.record(InputAction::PointerUp);
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.record(InputAction::MoveCursor { x, y });
    }

    fn click_at(&mut self, x: i32, y: i32) {
        self.record(InputAction::Click { x, y });
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.screen
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}
