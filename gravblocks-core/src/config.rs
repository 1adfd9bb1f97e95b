//! Simulation configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! damping = 0.4
//! gravitational_constant = 10.0
//! constant_gravity = 98.0     # omit to disable
//! push_force = 120.0
//! tick_interval_ms = 10
//! background = "#000000"
//!
//! [population]
//! count = 12
//! size = [20.0, 60.0]
//! speed = [0.0, 150.0]
//! heavy_fraction = 0.2
//! heavy_mass = [50000.0, 100000.0]
//! light_mass = [100.0, 1000.0]
//! seed = 42
//! ```

use crate::color::Color;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DAMPING: f32 = 0.4;
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 10.0;
pub const DEFAULT_PUSH_FORCE: f32 = 120.0;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Fraction of velocity lost on a wall bounce, in [0, 1]
    pub damping: f32,
    /// Scales pairwise attraction between blocks
    pub gravitational_constant: f32,
    /// Constant downward acceleration, registered under the `gravity` key
    pub constant_gravity: Option<f32>,
    /// Magnitude of each directional force
    pub push_force: f32,
    /// Nominal driver interval
    pub tick_interval_ms: u64,
    pub background: Color,
    pub surface_width: u32,
    pub surface_height: u32,
    pub population: Population,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            constant_gravity: None,
            push_force: DEFAULT_PUSH_FORCE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            background: Color::BLACK,
            surface_width: 800,
            surface_height: 600,
            population: Population::default(),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravitational_constant(mut self, g: f32) -> Self {
        self.gravitational_constant = g;
        self
    }

    pub fn with_constant_gravity(mut self, gravity: Option<f32>) -> Self {
        self.constant_gravity = gravity;
        self
    }

    pub fn with_push_force(mut self, magnitude: f32) -> Self {
        self.push_force = magnitude;
        self
    }

    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.surface_width = width;
        self.surface_height = height;
        self
    }

    pub fn with_population(mut self, population: Population) -> Self {
        self.population = population;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SimError::invalid_config(format!(
                "damping must be within [0, 1], got {}",
                self.damping
            )));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(SimError::invalid_config("gravitational_constant must be finite"));
        }
        if let Some(g) = self.constant_gravity {
            if !g.is_finite() {
                return Err(SimError::invalid_config("constant_gravity must be finite"));
            }
        }
        if !self.push_force.is_finite() {
            return Err(SimError::invalid_config("push_force must be finite"));
        }
        if self.tick_interval_ms == 0 {
            return Err(SimError::invalid_config("tick_interval_ms must be at least 1"));
        }
        self.population.validate()
    }
}

/// Parameters for the random initial layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Population {
    pub count: usize,
    /// Side length range; width and height are drawn independently
    pub size: [f32; 2],
    /// Initial speed range per axis, sign chosen at random
    pub speed: [f32; 2],
    /// Share of blocks drawn from the heavy mass band
    pub heavy_fraction: f64,
    pub heavy_mass: [f32; 2],
    pub light_mass: [f32; 2],
    pub seed: Option<u64>,
}

impl Default for Population {
    fn default() -> Self {
        Self {
            count: 12,
            size: [20.0, 60.0],
            speed: [0.0, 150.0],
            heavy_fraction: 0.2,
            heavy_mass: [50_000.0, 100_000.0],
            light_mass: [100.0, 1_000.0],
            seed: None,
        }
    }
}

impl Population {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_range("population.size", self.size, 0.0)?;
        check_range("population.speed", self.speed, 0.0)?;
        check_range("population.heavy_mass", self.heavy_mass, f32::MIN_POSITIVE)?;
        check_range("population.light_mass", self.light_mass, f32::MIN_POSITIVE)?;
        if !(0.0..=1.0).contains(&self.heavy_fraction) {
            return Err(SimError::invalid_config(format!(
                "population.heavy_fraction must be within [0, 1], got {}",
                self.heavy_fraction
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, [lo, hi]: [f32; 2], min: f32) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() || lo < min || lo > hi {
        return Err(SimError::invalid_config(format!(
            "{name} must be a finite range [lo, hi] with {min} <= lo <= hi, got [{lo}, {hi}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = SimConfig::from_toml_str(
            r##"
            damping = 0.1
            constant_gravity = 98.0
            background = "#102030"

            [population]
            count = 3
            seed = 7
            "##,
        )
        .unwrap();

        assert_eq!(config.damping, 0.1);
        assert_eq!(config.constant_gravity, Some(98.0));
        assert_eq!(config.background, Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(config.population.count, 3);
        assert_eq!(config.population.seed, Some(7));
        assert_eq!(config.population.heavy_fraction, 0.2);
        assert_eq!(config.push_force, DEFAULT_PUSH_FORCE);
    }

    #[test]
    fn rejects_out_of_range_damping() {
        let err = SimConfig::from_toml_str("damping = 1.5").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
        assert!(SimConfig::default().with_damping(-0.1).validate().is_err());
    }

    #[test]
    fn rejects_non_positive_mass_band() {
        let config = SimConfig::default().with_population(Population {
            light_mass: [0.0, 10.0],
            ..Population::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_range_and_unknown_fields() {
        assert!(SimConfig::from_toml_str("[population]\nsize = [50.0, 10.0]").is_err());
        assert!(matches!(
            SimConfig::from_toml_str("dampening = 0.3"),
            Err(SimError::ConfigParse(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("background = \"red\""),
            Err(SimError::ConfigParse(_))
        ));
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = SimConfig::default().with_constant_gravity(Some(9.8));
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
    }
}
