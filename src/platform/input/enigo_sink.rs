use super::InputSink;
use crate::models::input::{Key, ScreenSize};
use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use tracing::{info, warn};

/// Injects keyboard and mouse events into the OS through `enigo`.
pub struct EnigoSink {
    enigo: Enigo,
}

impl EnigoSink {
    pub fn new() -> Result<Self, String> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| format!("Failed to connect to the input backend: {:?}", e))?;

        info!("OS input injection ready");
        Ok(Self { enigo })
    }

    fn map_key(key: Key) -> enigo::Key {
        match key {
            Key::Left => enigo::Key::LeftArrow,
            Key::Right => enigo::Key::RightArrow,
            Key::Up => enigo::Key::UpArrow,
            Key::Down => enigo::Key::DownArrow,
            Key::Space => enigo::Key::Space,
        }
    }

    fn key(&mut self, key: Key, direction: Direction) {
        if let Err(e) = self.enigo.key(Self::map_key(key), direction) {
            warn!("Failed to inject key {} ({:?}): {:?}", key.as_str(), direction, e);
        }
    }

    fn button(&mut self, direction: Direction) {
        if let Err(e) = self.enigo.button(Button::Left, direction) {
            warn!("Failed to inject left button ({:?}): {:?}", direction, e);
        }
    }

    fn move_to(&mut self, x: i32, y: i32) {
        if let Err(e) = self.enigo.move_mouse(x, y, Coordinate::Abs) {
            warn!("Failed to move cursor to ({}, {}): {:?}", x, y, e);
        }
    }
}

impl InputSink for EnigoSink {
    fn press_key(&mut self, key: Key) {
        self.key(key, Direction::Press);
    }

    fn release_key(&mut self, key: Key) {
        self.key(key, Direction::Release);
    }

    fn pointer_down(&mut self) {
        self.button(Direction::Press);
    }

    fn pointer_up(&mut self) {
        self.button(Direction::Release);
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
    }

    fn click_at(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.button(Direction::Click);
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        match self.enigo.main_display() {
            Ok((w, h)) if w > 0 && h > 0 => Some(ScreenSize::new(w as u32, h as u32)),
            Ok(_) => None,
            Err(e) => {
                warn!("Could not query display size: {:?}", e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "enigo"
    }
}
