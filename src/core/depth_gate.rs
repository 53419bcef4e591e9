use crate::core::config::Config;
use crate::models::pose::DepthStatus;

/// Classifies how far the user stands from the camera using nose depth.
///
/// Both bounds are strict: a depth exactly on `min_z` or `max_z` is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthGate {
    min_z: f32,
    max_z: f32,
}

impl DepthGate {
    pub fn new(min_z: f32, max_z: f32) -> Self {
        Self { min_z, max_z }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.min_z, config.max_z)
    }

    pub fn classify(&self, nose_z: f32) -> (DepthStatus, &'static str) {
        let status = if nose_z < self.min_z {
            DepthStatus::TooClose
        } else if nose_z > self.max_z {
            DepthStatus::TooFar
        } else {
            DepthStatus::Ok
        };

        (status, status.message())
    }
}

impl Default for DepthGate {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let gate = DepthGate::default();
        assert_eq!(gate.classify(-0.71), (DepthStatus::TooClose, "Move back (too close)"));
        assert_eq!(gate.classify(0.21), (DepthStatus::TooFar, "Move closer (too far)"));
        assert_eq!(gate.classify(0.0), (DepthStatus::Ok, "Position OK"));
    }

    #[test]
    fn test_bounds_are_inclusive_ok() {
        let gate = DepthGate::default();
        assert_eq!(gate.classify(-0.7).0, DepthStatus::Ok);
        assert_eq!(gate.classify(0.2).0, DepthStatus::Ok);
    }

    #[test]
    fn test_custom_bounds() {
        let gate = DepthGate::new(-0.3, 0.0);
        assert_eq!(gate.classify(-0.5).0, DepthStatus::TooClose);
        assert_eq!(gate.classify(0.1).0, DepthStatus::TooFar);
        assert_eq!(gate.classify(-0.1).0, DepthStatus::Ok);
    }
}
