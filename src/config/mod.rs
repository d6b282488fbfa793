//! Stage configuration, loaded from JSON or RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::constants::{STEEP_PITCH_MAX, STEEP_PITCH_MIN};
use crate::error::{PathError, PathResult};
use crate::logging::TracingConfig;

/// What an intersection tile does with its camera override when the camera
/// leaves the steep band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraOverridePolicy {
    /// Drop the override on the first refresh outside the band
    #[default]
    ClearOutsideBand,
    /// Keep the last override until a refresh inside the band replaces it
    Sticky,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub camera_override: CameraOverridePolicy,
    /// Absolute camera pitch band (degrees, inclusive) that enables the
    /// camera override search
    pub steep_band: (f32, f32),
    pub logging: TracingConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            camera_override: CameraOverridePolicy::default(),
            steep_band: (STEEP_PITCH_MIN, STEEP_PITCH_MAX),
            logging: TracingConfig::default(),
        }
    }
}

impl StageConfig {
    pub fn from_json(json: &str) -> PathResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> PathResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file: `.ron` is parsed as RON, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> PathResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_ron = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));
        debug!(path = %path.display(), ron = is_ron, "loading stage config");
        if is_ron {
            Self::from_ron(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn validate(&self) -> PathResult<()> {
        let (min, max) = self.steep_band;
        if !min.is_finite() || !max.is_finite() {
            return Err(PathError::Configuration(format!(
                "steep band ({min}, {max}) is not finite"
            )));
        }
        if min > max {
            return Err(PathError::Configuration(format!(
                "steep band min {min} is above max {max}"
            )));
        }
        self.logging.directives()?;
        Ok(())
    }

    pub fn to_json(&self) -> PathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_ron(&self) -> PathResult<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
