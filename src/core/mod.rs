pub mod config;

// Gesture pipeline
pub mod depth_gate;
pub mod gesture_classifier;
pub mod input_state;
pub mod mode_controller;
pub mod gesture_controller;
pub mod session;
