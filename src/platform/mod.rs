// Platform integrations: landmark sources in, synthesized input out
pub mod input;
pub mod pose;
