//! Slider bounds for interactive front ends.
//!
//! These ranges are presentation defaults only. The engine accepts any value;
//! the controller passes raw slider positions through [`SliderSpec::apply`]
//! the way a slider widget would before building a parameter set.

use serde::{Deserialize, Serialize};
use sir_core::SimulationParameters;

/// Range, step and initial position of one slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    /// Lower bound (inclusive)
    pub min: f64,

    /// Upper bound (inclusive)
    pub max: f64,

    /// Snap increment measured from `min`; `None` for a continuous slider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Position on start-up and after a reset
    pub initial: f64,
}

impl SliderSpec {
    /// Continuous slider over `[min, max]`.
    pub fn continuous(min: f64, max: f64, initial: f64) -> Self {
        Self { min, max, step: None, initial }
    }

    /// Slider snapping to multiples of `step` above `min`.
    pub fn stepped(min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self { min, max, step: Some(step), initial }
    }

    /// Clamps `raw` into range and snaps it to the step grid.
    ///
    /// A NaN position falls back to the initial value.
    pub fn apply(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return self.initial;
        }
        let clamped = raw.max(self.min).min(self.max);
        match self.step {
            Some(step) if step > 0.0 => {
                let snapped = self.min + ((clamped - self.min) / step).round() * step;
                snapped.max(self.min).min(self.max)
            }
            _ => clamped,
        }
    }

    /// True if `value` already lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The five sliders of the interactive tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub beta: SliderSpec,
    pub gamma: SliderSpec,
    pub susceptible: SliderSpec,
    pub infected: SliderSpec,
    pub days: SliderSpec,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            beta: SliderSpec::continuous(0.01, 1.0, 0.3),
            gamma: SliderSpec::continuous(0.01, 0.5, 0.1),
            susceptible: SliderSpec::stepped(1.0, 1000.0, 1.0, 990.0),
            infected: SliderSpec::stepped(1.0, 100.0, 1.0, 10.0),
            days: SliderSpec::stepped(10.0, 365.0, 1.0, 160.0),
        }
    }
}

impl ParameterBounds {
    /// Parameter set built from every slider's initial position.
    pub fn initial_parameters(&self) -> SimulationParameters {
        SimulationParameters::new(
            self.beta.initial,
            self.gamma.initial,
            self.susceptible.initial,
            self.infected.initial,
            to_days(self.days.initial),
        )
    }

    /// Snaps a raw days-slider position to a whole horizon.
    pub fn apply_days(&self, raw: f64) -> usize {
        to_days(self.days.apply(raw))
    }

    /// True if every field of `params` lies within its slider range.
    pub fn contains(&self, params: &SimulationParameters) -> bool {
        self.beta.contains(params.beta)
            && self.gamma.contains(params.gamma)
            && self.susceptible.contains(params.s0)
            && self.infected.contains(params.i0)
            && self.days.contains(params.days as f64)
    }
}

fn to_days(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        1
    }
}
