//! Engine tuning knobs, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Engine configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Angle advance per animated frame. The angle wraps past 1.0.
    pub angle_step: f32,
    /// Accelerometer delivery rate requested on focus gain.
    pub sensor_rate_hz: u32,
    /// Looper identifier reserved for the sensor queue.
    pub sensor_channel_id: i32,
    /// Red, green and blue bits requested from the display configuration.
    pub color_bits: u8,
    /// Log the backend's vendor/renderer/version strings after acquisition.
    pub log_renderer_info: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            angle_step: 0.01,
            sensor_rate_hz: 60,
            sensor_channel_id: 3,
            color_bits: 8,
            log_renderer_info: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with. The angle step must lie in
    /// `(0, 1)` so the phase keeps moving forward and stays in `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.angle_step;
        if !step.is_finite() || step <= 0.0 || step >= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "angle_step must be in (0, 1), got {step}"
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}
