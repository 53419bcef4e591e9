pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::Config;
pub use crate::core::gesture_controller::{FrameReport, GestureController};
pub use crate::core::session::{run_session, SessionSummary, StopReason};
