//! Trajectory Metrics
//! ==================
//!
//! Summary statistics read off a finished run:
//! - **Peak**: largest infected count and the day it occurs
//! - **Final sizes**: S, I, R on the last day and the attack rate R/N
//! - **Physicality**: how many days left the range [0, N]
//!
//! Out-of-range values are counted, never clamped. They are a known artifact
//! of the unit-step Euler scheme for large β or γ.

use crate::model::{SimulationParameters, Trajectory};
use serde::{Deserialize, Serialize};

/// Summary of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    /// Total population N
    pub population: f64,

    /// Largest infected count over the horizon
    pub peak_infected: f64,

    /// First day on which the peak occurs
    pub peak_day: usize,

    pub final_susceptible: f64,
    pub final_infected: f64,
    pub final_recovered: f64,

    /// Fraction of the population recovered by the last day (R / N)
    pub attack_rate: f64,

    /// β / γ, absent when γ is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_reproduction_number: Option<f64>,

    /// Number of days with any compartment outside [0, N]
    pub nonphysical_days: usize,

    /// First such day, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_nonphysical_day: Option<usize>,
}

impl TrajectorySummary {
    /// Computes the summary for a trajectory produced from `params`.
    pub fn from_trajectory(params: &SimulationParameters, trajectory: &Trajectory) -> Self {
        let population = trajectory.population();

        let (peak_day, peak_infected) = trajectory
            .infected()
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (day, value)| {
                if value > best.1 {
                    (day, value)
                } else {
                    best
                }
            });

        let last = trajectory.last();
        let final_susceptible = last.map_or(0.0, |p| p.s);
        let final_infected = last.map_or(0.0, |p| p.i);
        let final_recovered = last.map_or(0.0, |p| p.r);

        let mut nonphysical_days = 0;
        let mut first_nonphysical_day = None;
        for point in trajectory.points() {
            let in_range = |v: f64| (0.0..=population).contains(&v);
            if !(in_range(point.s) && in_range(point.i) && in_range(point.r)) {
                nonphysical_days += 1;
                first_nonphysical_day.get_or_insert(point.day);
            }
        }

        Self {
            population,
            peak_infected: if trajectory.is_empty() { 0.0 } else { peak_infected },
            peak_day,
            final_susceptible,
            final_infected,
            final_recovered,
            attack_rate: final_recovered / population,
            basic_reproduction_number: params.basic_reproduction_number(),
            nonphysical_days,
            first_nonphysical_day,
        }
    }

    /// True if every day stayed within [0, N].
    pub fn is_physical(&self) -> bool {
        self.nonphysical_days == 0
    }
}
