//! Generation parameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automaton::AutomatonRules;
use crate::error::{LevelError, Result};
use crate::noise::{Interpolation, MAX_OCTAVES};
use crate::zones::{DEFAULT_MIN_SPAWN_EXIT_DISTANCE, DEFAULT_VALIDITY_THRESHOLD};

/// Everything the pipeline needs to produce one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid height in tiles (default: 100).
    pub height: usize,

    /// Grid width in tiles (default: 100).
    pub width: usize,

    pub rules: AutomatonRules,

    /// Automaton steps per attempt (default: 5).
    pub simulation_steps: usize,

    /// Share of open tiles the largest zone must own (default: 0.65).
    pub validity_threshold: f64,

    /// Minimum spawn to exit distance in tiles (default: 60).
    pub min_spawn_exit_distance: f64,

    /// Octaves of decoration noise (default: 5).
    pub noise_octaves: u32,

    pub interpolation: Interpolation,

    /// Attempts per threshold round before relaxing (default: 200).
    pub max_attempts: usize,

    /// Threshold decrease between rounds (default: 0.05). Zero disables relaxing.
    pub threshold_relaxation: f64,

    /// Lowest threshold relaxation may reach (default: 0.4).
    pub min_validity_threshold: f64,

    pub hazards: HazardConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            height: 100,
            width: 100,
            rules: AutomatonRules::default(),
            simulation_steps: 5,
            validity_threshold: DEFAULT_VALIDITY_THRESHOLD,
            min_spawn_exit_distance: DEFAULT_MIN_SPAWN_EXIT_DISTANCE,
            noise_octaves: 5,
            interpolation: Interpolation::Linear,
            max_attempts: 200,
            threshold_relaxation: 0.05,
            min_validity_threshold: 0.4,
            hazards: HazardConfig::default(),
        }
    }
}

/// Hazard densities, as a share of the eligible tiles in each zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Share of ground tiles that get a spike (default: 0.25).
    pub spike_density: f64,
    /// Share of left-wall and of right-wall tiles that get a turret (default: 0.125).
    pub turret_density: f64,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            spike_density: 0.25,
            turret_density: 0.125,
        }
    }
}

impl HazardConfig {
    /// No hazards at all.
    pub fn none() -> Self {
        Self {
            spike_density: 0.0,
            turret_density: 0.0,
        }
    }
}

impl GenerationConfig {
    /// A default config at a different size. The spawn/exit distance is
    /// scaled down so small maps stay solvable.
    pub fn with_size(height: usize, width: usize) -> Self {
        let default = Self::default();
        let shortest = height.min(width) as f64;
        Self {
            height,
            width,
            min_spawn_exit_distance: default.min_spawn_exit_distance.min(shortest * 0.6),
            ..default
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.height < 3 || self.width < 3 {
            return Err(invalid(format!(
                "grid must be at least 3x3, got {}x{}",
                self.height, self.width
            )));
        }
        if !(0.0..=1.0).contains(&self.rules.alive_probability) {
            return Err(invalid(format!(
                "alive_probability {} outside [0, 1]",
                self.rules.alive_probability
            )));
        }
        if self.rules.birth_limit > 8 || self.rules.starvation_limit > 8 {
            return Err(invalid("birth and starvation limits must be at most 8".to_string()));
        }
        for (name, value) in [
            ("validity_threshold", self.validity_threshold),
            ("min_validity_threshold", self.min_validity_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} {value} outside (0, 1]")));
            }
        }
        if self.min_validity_threshold > self.validity_threshold {
            return Err(invalid("min_validity_threshold exceeds validity_threshold".to_string()));
        }
        if !(self.threshold_relaxation >= 0.0) {
            return Err(invalid("threshold_relaxation must be non-negative".to_string()));
        }
        if !(self.min_spawn_exit_distance >= 0.0) {
            return Err(invalid("min_spawn_exit_distance must be non-negative".to_string()));
        }
        if self.noise_octaves > MAX_OCTAVES {
            return Err(invalid(format!(
                "noise_octaves {} exceeds {}",
                self.noise_octaves, MAX_OCTAVES
            )));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1".to_string()));
        }
        for (name, value) in [
            ("spike_density", self.hazards.spike_density),
            ("turret_density", self.hazards.turret_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} {value} outside [0, 1]")));
            }
        }
        Ok(())
    }

    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn invalid(message: String) -> LevelError {
    LevelError::InvalidConfig(message)
}
