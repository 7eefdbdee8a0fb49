// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! World simulation configuration

use crate::error::{Error, Result};

/// Tunables for the world system
///
/// # Examples
///
/// ```
/// use platform_physics::physics::WorldConfig;
///
/// let config = WorldConfig::default()
///     .with_fixed_time_step(0.01)
///     .with_max_steps_per_frame(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Length of one physics step in seconds
    pub fixed_time_step: f64,
    /// Resistance every body is reset to at the start of a step
    pub air_resistance: f64,
    /// Velocity components with a smaller magnitude snap to zero
    pub velocity_snap_threshold: f64,
    /// Lowest vertical velocity of a grounded body under gravity
    pub ground_velocity_clamp: f64,
    /// Most steps run in one frame; further backlog is dropped
    pub max_steps_per_frame: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            fixed_time_step: 1.0 / 150.0,
            air_resistance: 1.035,
            velocity_snap_threshold: 0.25,
            ground_velocity_clamp: -5.0,
            max_steps_per_frame: 32,
        }
    }
}

impl WorldConfig {
    /// Set the fixed step length
    ///
    /// # Panics
    ///
    /// Panics if the step is non-positive, NaN, or infinite
    pub fn with_fixed_time_step(mut self, step: f64) -> Self {
        assert!(
            step > 0.0 && step.is_finite(),
            "Fixed time step must be positive and finite"
        );
        self.fixed_time_step = step;
        self
    }

    /// Set the air resistance constant
    pub fn with_air_resistance(mut self, resistance: f64) -> Self {
        self.air_resistance = resistance;
        self
    }

    /// Set the snap-to-zero threshold
    pub fn with_velocity_snap_threshold(mut self, threshold: f64) -> Self {
        self.velocity_snap_threshold = threshold;
        self
    }

    /// Set the grounded downward velocity floor
    pub fn with_ground_velocity_clamp(mut self, clamp: f64) -> Self {
        self.ground_velocity_clamp = clamp;
        self
    }

    /// Set the per-frame step cap
    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_time_step > 0.0 && self.fixed_time_step.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "fixed time step {} must be positive and finite",
                self.fixed_time_step
            )));
        }
        if !(self.air_resistance >= 0.0 && self.air_resistance.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "air resistance {} must be non-negative and finite",
                self.air_resistance
            )));
        }
        if !(self.velocity_snap_threshold >= 0.0 && self.velocity_snap_threshold.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "velocity snap threshold {} must be non-negative and finite",
                self.velocity_snap_threshold
            )));
        }
        if !self.ground_velocity_clamp.is_finite() || self.ground_velocity_clamp > 0.0 {
            return Err(Error::InvalidConfig(format!(
                "ground velocity clamp {} must be finite and not positive",
                self.ground_velocity_clamp
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(Error::InvalidConfig(
                "max steps per frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
