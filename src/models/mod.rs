// Data models for pose landmarks, control lines and injected input

pub mod input;
pub mod pose;
