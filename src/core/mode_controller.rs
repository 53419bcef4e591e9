use crate::core::input_state::InputStateMachine;
use crate::models::input::{Mode, UiEvent};
use crate::platform::input::InputSink;
use tracing::info;

/// What the frame loop should do after a UI event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Control mode plus the display toggles driven by UI events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
    show_hints: bool,
    show_help: bool,
}

impl ModeController {
    pub fn new(show_hints: bool) -> Self {
        Self {
            mode: Mode::Keyboard,
            show_hints,
            show_help: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn show_hints(&self) -> bool {
        self.show_hints
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Switch to `mode`, releasing every held line first so nothing asserted
    /// under one rule set stays held under the other.
    pub fn switch_to<S: InputSink>(&mut self, mode: Mode, machine: &mut InputStateMachine<S>) {
        if self.mode == mode {
            return;
        }

        let released = machine.release_all();
        self.mode = mode;

        match mode {
            Mode::Mouse => {
                info!("Mouse control mode enabled ({} lines released)", released);
                info!("  Right hand - cursor movement");
                info!("  Left hand left - hold left mouse button (drag)");
            }
            Mode::Keyboard => {
                info!("Keyboard control mode enabled ({} lines released)", released);
                info!("  Hands left/right - arrow keys, hands up - up + space, hands down - down");
                info!("  Both hands spread - mouse click");
            }
        }
    }

    pub fn toggle<S: InputSink>(&mut self, machine: &mut InputStateMachine<S>) -> Mode {
        self.switch_to(self.mode.toggled(), machine);
        self.mode
    }

    pub fn handle_event<S: InputSink>(
        &mut self,
        event: UiEvent,
        machine: &mut InputStateMachine<S>,
    ) -> LoopControl {
        match event {
            UiEvent::ToggleMode => {
                self.toggle(machine);
            }
            UiEvent::ToggleHints => {
                self.show_hints = !self.show_hints;
                info!("Hints {}", if self.show_hints { "shown" } else { "hidden" });
            }
            UiEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                info!("Instructions {}", if self.show_help { "opened" } else { "closed" });
            }
            UiEvent::Exit => {
                info!("Exit requested");
                return LoopControl::Exit;
            }
        }

        LoopControl::Continue
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(true)
    }
}
