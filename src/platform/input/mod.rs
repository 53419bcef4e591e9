// Input injection - keyboard keys, pointer buttons and cursor movement

use crate::models::input::{Key, ScreenSize};

pub mod recording_sink;
pub use recording_sink::RecordingSink;

#[cfg(feature = "os-input")]
pub mod enigo_sink;
#[cfg(feature = "os-input")]
pub use enigo_sink::EnigoSink;

/// Destination for synthesized input.
///
/// Every call is fire-and-forget: an implementation that fails to inject an
/// event logs the failure itself and returns normally, so the frame loop and
/// the controller's own pressed-state bookkeeping are never interrupted.
pub trait InputSink {
    fn press_key(&mut self, key: Key);

    fn release_key(&mut self, key: Key);

    fn pointer_down(&mut self);

    fn pointer_up(&mut self);

    /// Move the cursor to absolute screen coordinates
    fn move_cursor(&mut self, x: i32, y: i32);

    /// Full left click (down + up) at absolute screen coordinates
    fn click_at(&mut self, x: i32, y: i32);

    /// Size of the display the sink drives, when the backend can tell
    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }

    /// Human readable backend name
    fn name(&self) -> &'static str;
}

impl<S: InputSink + ?Sized> InputSink for Box<S> {
    fn press_key(&mut self, key: Key) {
        (**self).press_key(key)
    }

    fn release_key(&mut self, key: Key) {
        (**self).release_key(key)
    }

    fn pointer_down(&mut self) {
        (**self).pointer_down()
    }

    fn pointer_up(&mut self) {
        (**self).pointer_up()
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        (**self).move_cursor(x, y)
    }

    fn click_at(&mut self, x: i32, y: i32) {
        (**self).click_at(x, y)
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        (**self).screen_size()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Build the sink for this process.
///
/// The OS backend is only compiled with the `os-input` feature; without it,
/// or when it cannot connect, actions are recorded and logged instead.
pub fn create_sink(dry_run: bool) -> Box<dyn InputSink> {
    if dry_run {
        return Box::new(RecordingSink::new());
    }

    #[cfg(feature = "os-input")]
    {
        match EnigoSink::new() {
            Ok(sink) => return Box::new(sink),
            Err(e) => {
                tracing::warn!("OS input injection unavailable ({}), falling back to dry run", e);
            }
        }
    }

    #[cfg(not(feature = "os-input"))]
    tracing::warn!("Built without the `os-input` feature, input actions will only be logged");

    Box::new(RecordingSink::new())
}
