//! Configuration System
//!
//! Loads model and run parameters from `schelling.toml` so runs can be tuned
//! without recompiling. Every field has a default, so a partial file (or no
//! file at all) is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::city::CityCenters;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "schelling.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub run: RunConfig,
}

/// Parameters the model is constructed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub width: u32,
    pub height: u32,
    /// Chance that a cell starts occupied
    pub density: f64,
    /// Chance that a new agent is in the minority
    pub minority_pc: f64,
    /// Minimum similar/unsimilar ratio away from the city centers
    pub homophily: f64,
    /// Neighbor search radius
    pub radius: u32,
    /// Manhattan distance that counts as "near" a city center
    pub distance: u32,
    /// Spacing of the two city centers; half the diagonal when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            density: 0.8,
            minority_pc: 0.2,
            homophily: 1.5,
            radius: 1,
            distance: 2,
            city_distance: None,
            seed: None,
        }
    }
}

/// Step driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Upper bound on executed steps when the model never converges
    pub max_steps: u64,
    /// Steps between snapshot files; 0 writes only the first and last
    pub snapshot_interval: u64,
    pub output_dir: String,
    pub write_snapshots: bool,
    /// Print the grid as text after each step
    pub render: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: 200,
            snapshot_interval: 10,
            output_dir: "output".to_string(),
            write_snapshots: true,
            render: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    /// Render as TOML, e.g. to write a starter config
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl ModelConfig {
    /// Construct with every required parameter; optional ones are unset
    pub fn new(
        height: u32,
        width: u32,
        density: f64,
        minority_pc: f64,
        homophily: f64,
        radius: u32,
        distance: u32,
    ) -> Self {
        Self {
            width,
            height,
            density,
            minority_pc,
            homophily,
            radius,
            distance,
            city_distance: None,
            seed: None,
        }
    }

    pub fn with_city_distance(mut self, city_distance: f64) -> Self {
        self.city_distance = Some(city_distance);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// City-center spacing after applying the default
    pub fn effective_city_distance(&self) -> f64 {
        self.city_distance
            .unwrap_or_else(|| CityCenters::default_distance(self.width, self.height))
    }

    /// Check every parameter against its documented range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::invalid("width", self.width, "at least 1"));
        }
        if self.height == 0 {
            return Err(ConfigError::invalid("height", self.height, "at least 1"));
        }
        if u64::from(self.width) * u64::from(self.height) > u64::from(u32::MAX) {
            return Err(ConfigError::invalid(
                "width * height",
                u64::from(self.width) * u64::from(self.height),
                "at most 4294967295 cells",
            ));
        }
        check_probability("density", self.density)?;
        check_probability("minority_pc", self.minority_pc)?;
        if !self.homophily.is_finite() || self.homophily < 0.0 {
            return Err(ConfigError::invalid(
                "homophily",
                self.homophily,
                "a finite number >= 0",
            ));
        }
        if self.radius == 0 {
            return Err(ConfigError::invalid("radius", self.radius, "at least 1"));
        }
        if let Some(city_distance) = self.city_distance {
            if !city_distance.is_finite() || city_distance < 0.0 {
                return Err(ConfigError::invalid(
                    "city_distance",
                    city_distance,
                    "a finite number >= 0",
                ));
            }
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, value, "between 0.0 and 1.0"))
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid {name} = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> Self {
        ConfigError::InvalidParameter {
            name,
            value: value.to_string(),
            expected,
        }
    }

    /// Name of the offending parameter, when there is one
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidParameter { name, .. } => Some(name),
            _ => None,
        }
    }
}
