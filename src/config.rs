use crate::error::{Error, Result};
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAX_SEARCH_RADIUS: usize = 64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub depth: DepthConfig,
    pub filter: FilterConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Meters per raw depth unit (z16 sensors report millimeters)
    pub depth_unit: f32,

    pub search_radius: usize,

    pub max_depth: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            depth_unit: 0.001,
            search_radius: 5,
            max_depth: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub initial_state: f32,
    pub initial_uncertainty: f32,
    pub process_variance: f32,
    pub measurement_variance: f32,

    pub history_len: usize,

    /// Inclusive `[low, high]` degrees
    pub unreliable_bands: Vec<[f32; 2]>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            initial_state: 0.0,
            initial_uncertainty: 1.0,
            process_variance: 0.1,
            measurement_variance: 1.0,
            history_len: 5,
            unreliable_bands: vec![[70.0, 110.0], [250.0, 290.0]],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub body_arrow_length: f32,
    pub gaze_arrow_length: f32,

    /// Frames a track context survives without a matching skeleton
    pub max_track_age: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            body_arrow_length: 3.0,
            gaze_arrow_length: 4.0,
            max_track_age: 30,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidConfig(msg)) };

        if !(self.depth.depth_unit > 0.0) {
            return invalid(format!("depth.depth_unit must be > 0, got {}", self.depth.depth_unit));
        }

        if !(self.depth.max_depth > 0.0) {
            return invalid(format!("depth.max_depth must be > 0, got {}", self.depth.max_depth));
        }

        if self.depth.search_radius > MAX_SEARCH_RADIUS {
            return invalid(format!(
                "depth.search_radius must be <= {}, got {}",
                MAX_SEARCH_RADIUS, self.depth.search_radius
            ));
        }

        let f = &self.filter;
        if f.history_len == 0 {
            return invalid("filter.history_len must be at least 1".to_string());
        }

        if !(f.initial_uncertainty >= 0.0) || !(f.process_variance >= 0.0) {
            return invalid("filter uncertainty and process variance must be >= 0".to_string());
        }

        if !(f.measurement_variance > 0.0) {
            return invalid(format!(
                "filter.measurement_variance must be > 0, got {}",
                f.measurement_variance
            ));
        }

        for [lo, hi] in &f.unreliable_bands {
            if !(lo <= hi) || *lo < 0.0 || *hi > 360.0 {
                return invalid(format!("bad unreliable band [{}, {}]", lo, hi));
            }
        }

        let p = &self.pipeline;
        if !(p.body_arrow_length > 0.0) || !(p.gaze_arrow_length > 0.0) {
            return invalid("arrow lengths must be > 0".to_string());
        }

        Ok(())
    }
}
