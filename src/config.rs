//! Run configuration loaded from JSON

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pacing::ExponentialDecay;
use crate::pmf::Pmf;
use crate::walk::WalkParams;
use crate::DemoError;

/// Runtime configuration for the `conv-demos` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Random walk parameters
    pub walk: WalkParams,
    /// RNG seed for reproducibility
    pub seed: u64,
    /// PMF fed to the adding-random-numbers demo
    pub pmf: Vec<f64>,
    /// Number of self-convolution steps
    pub iterations: usize,
    /// Delay after the first frame [ms]
    pub base_delay_ms: u64,
    /// Fraction by which each subsequent delay shrinks
    pub decay_rate: f64,
    /// Frame width [px]
    pub frame_width: u32,
    /// Frame height [px]
    pub frame_height: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            walk: WalkParams::default(),
            seed: 17,
            pmf: vec![1.0 / 6.0; 6],
            iterations: 5,
            base_delay_ms: 1_000,
            decay_rate: 0.25,
            frame_width: 960,
            frame_height: 540,
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), DemoError> {
        self.walk.validate()?;
        Pmf::validate(&self.pmf)?;

        if !(0.0..1.0).contains(&self.decay_rate) {
            return Err(DemoError::InvalidConfig(format!(
                "decay_rate must be in [0, 1), got {}",
                self.decay_rate
            )));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(DemoError::InvalidConfig(
                "frame_width and frame_height must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn pacing(&self) -> Result<ExponentialDecay, DemoError> {
        ExponentialDecay::new(Duration::from_millis(self.base_delay_ms), self.decay_rate)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DemoError> {
        let raw = fs::read_to_string(path)?;
        let config: DemoConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
