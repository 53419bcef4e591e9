use crate::models::input::ScreenSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Horizontal distance from the nose (normalized) inside which left/right do not register
    pub deadzone: f32,
    /// How far above the nose a wrist must be for "up"
    pub up_threshold: f32,
    /// Offset of the "down" line from the waist; negative values sit below the waist
    pub down_threshold: f32,
    /// Nose depth below which the user is too close
    pub min_z: f32,
    /// Nose depth above which the user is too far
    pub max_z: f32,
    /// Cursor smoothing factor (0.0-1.0, higher = faster response)
    pub mouse_smoothing: f32,
    /// Minimum pose detection confidence passed to the pose model
    pub min_detection_confidence: f32,
    /// Minimum pose tracking confidence passed to the pose model
    pub min_tracking_confidence: f32,
    /// Camera device index used by the pose model
    pub camera_index: u32,
    /// Screen width override; detected from the input backend when unset
    pub screen_width: Option<u32>,
    /// Screen height override; detected from the input backend when unset
    pub screen_height: Option<u32>,
    /// Show control zones and gesture hints
    pub show_hints: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deadzone: 0.2,
            up_threshold: 0.05,
            down_threshold: -0.05,
            min_z: -0.7,
            max_z: 0.2,
            mouse_smoothing: 0.7,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            camera_index: 0,
            screen_width: None,
            screen_height: None,
            show_hints: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl Config {
    /// Load configuration from `path`, creating it with defaults if it doesn't exist
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Reset `path` to the default configuration
    pub fn reset_at(path: &Path) -> ConfigResult<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=0.5).contains(&self.deadzone) {
            return Err(ConfigError::Invalid(format!(
                "deadzone {} must be between 0.0 and 0.5",
                self.deadzone
            )));
        }

        if !(0.0..=1.0).contains(&self.up_threshold) {
            return Err(ConfigError::Invalid(format!(
                "up_threshold {} must be between 0.0 and 1.0",
                self.up_threshold
            )));
        }

        if !(-1.0..=1.0).contains(&self.down_threshold) {
            return Err(ConfigError::Invalid(format!(
                "down_threshold {} must be between -1.0 and 1.0",
                self.down_threshold
            )));
        }

        // NaN fails this check too
        if !(self.min_z < self.max_z) {
            return Err(ConfigError::Invalid(format!(
                "min_z {} must be less than max_z {}",
                self.min_z, self.max_z
            )));
        }

        if !(self.mouse_smoothing > 0.0 && self.mouse_smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "mouse_smoothing {} must be in (0.0, 1.0]",
                self.mouse_smoothing
            )));
        }

        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} {} must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        if self.screen_width == Some(0) || self.screen_height == Some(0) {
            return Err(ConfigError::Invalid(
                "screen_width and screen_height must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Screen size to drive: the configured override, else what the input backend reports,
    /// else 1920x1080. Each axis is overridden independently.
    pub fn resolve_screen(&self, detected: Option<ScreenSize>) -> ScreenSize {
        let base = detected.unwrap_or_default();
        ScreenSize::new(
            self.screen_width.unwrap_or(base.width),
            self.screen_height.unwrap_or(base.height),
        )
    }

    /// Get the configuration file path
    pub fn get_config_path() -> ConfigResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDirectory)?;

        let mut path = PathBuf::from(home);
        path.push(".motion_controller");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
