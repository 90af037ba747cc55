//! Run configuration, loaded from JSON and overridden from the command line.

use crate::bounds::ParameterBounds;
use serde::{Deserialize, Serialize};
use sir_core::{SimulationParameters, DEFAULT_TOLERANCE};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Parameters of the first run
    pub parameters: SimulationParameters,

    /// Slider ranges applied to interactive events
    pub bounds: ParameterBounds,

    /// Relative tolerance for the conservation check
    pub tolerance: f64,

    /// ASCII chart width in characters
    pub plot_width: usize,

    /// ASCII chart height in characters
    pub plot_height: usize,

    /// Capacity of the controller event channel
    pub channel_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            parameters: SimulationParameters::default(),
            bounds: ParameterBounds::default(),
            tolerance: DEFAULT_TOLERANCE,
            plot_width: 72,
            plot_height: 20,
            channel_capacity: 64,
        }
    }
}

/// Command-line values that replace fields of [`SimConfig::parameters`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterOverrides {
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub s0: Option<f64>,
    pub i0: Option<f64>,
    pub days: Option<usize>,
}

impl ParameterOverrides {
    /// Flag names of the overrides that are set, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            ("--beta", self.beta.is_some()),
            ("--gamma", self.gamma.is_some()),
            ("--s0", self.s0.is_some()),
            ("--i0", self.i0.is_some()),
            ("--days", self.days.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Replaces every field of `params` that has an override.
    pub fn apply(&self, params: SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            beta: self.beta.unwrap_or(params.beta),
            gamma: self.gamma.unwrap_or(params.gamma),
            s0: self.s0.unwrap_or(params.s0),
            i0: self.i0.unwrap_or(params.i0),
            days: self.days.unwrap_or(params.days),
        }
    }
}

impl SimConfig {
    /// Applies command-line overrides to the first-run parameters.
    pub fn with_overrides(mut self, overrides: &ParameterOverrides) -> Self {
        self.parameters = overrides.apply(self.parameters);
        self
    }

    /// Loads a configuration file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
