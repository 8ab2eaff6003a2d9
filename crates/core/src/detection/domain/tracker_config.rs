use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::tracker_error::TrackerError;

/// Parameters conditioning a single detector call.
///
/// Fields may be assigned one at a time; nothing is checked until a
/// detection is issued (see [`TrackerConfig::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Scale factor for scan windows.
    pub scale: f32,
    /// How many neighbors a candidate rectangle needs to be retained.
    pub min_neighbors: u32,
    /// Faces narrower than this are ignored.
    pub min_object_width: u32,
    /// Faces wider than this are ignored; 0 means unbounded.
    pub max_object_width: u32,
    /// Ask the detector for a landmark block per face.
    pub landmarks: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_neighbors: 0,
            min_object_width: 0,
            max_object_width: 0,
            landmarks: false,
        }
    }
}

/// Configuration lowered to the detector's integer argument types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectParams {
    pub scale: f32,
    pub min_neighbors: i32,
    pub min_object_width: i32,
    pub max_object_width: i32,
    pub landmarks: bool,
}

impl DetectParams {
    /// Landmark flag as the 0|1 integer the native entry points expect.
    pub fn landmark_flag(&self) -> i32 {
        i32::from(self.landmarks)
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<DetectParams, TrackerError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TrackerError::InvalidConfiguration(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.max_object_width != 0 && self.min_object_width > self.max_object_width {
            return Err(TrackerError::InvalidConfiguration(format!(
                "min_object_width {} exceeds max_object_width {}",
                self.min_object_width, self.max_object_width
            )));
        }
        Ok(DetectParams {
            scale: self.scale,
            min_neighbors: to_native("min_neighbors", self.min_neighbors)?,
            min_object_width: to_native("min_object_width", self.min_object_width)?,
            max_object_width: to_native("max_object_width", self.max_object_width)?,
            landmarks: self.landmarks,
        })
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn to_native(name: &str, value: u32) -> Result<i32, TrackerError> {
    i32::try_from(value).map_err(|_| {
        TrackerError::InvalidConfiguration(format!("{name} {value} does not fit a 32-bit int"))
    })
}
