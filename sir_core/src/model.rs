//! The simulation engine - forward-Euler SIR recurrence with a one-day step.

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial transmission rate of the reference experience.
pub const DEFAULT_BETA: f64 = 0.3;

/// Initial recovery rate of the reference experience.
pub const DEFAULT_GAMMA: f64 = 0.1;

/// Initial susceptible count.
pub const DEFAULT_SUSCEPTIBLE: f64 = 990.0;

/// Initial infected count.
pub const DEFAULT_INFECTED: f64 = 10.0;

/// Initial horizon in days.
pub const DEFAULT_DAYS: usize = 160;

/// Input to a single simulation run.
///
/// Ranges are not enforced here. Out-of-range β, γ or counts are computed
/// literally and may yield a non-physical trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Transmission rate β (per day)
    pub beta: f64,

    /// Recovery rate γ (per day)
    pub gamma: f64,

    /// Initial susceptible count S0
    pub s0: f64,

    /// Initial infected count I0
    pub i0: f64,

    /// Horizon length in days (number of points in each series)
    pub days: usize,
}

impl SimulationParameters {
    /// Creates a parameter set from the five scalars.
    pub fn new(beta: f64, gamma: f64, s0: f64, i0: f64, days: usize) -> Self {
        Self { beta, gamma, s0, i0, days }
    }

    /// Sets the transmission rate.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the recovery rate.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the initial susceptible count.
    pub fn with_susceptible(mut self, s0: f64) -> Self {
        self.s0 = s0;
        self
    }

    /// Sets the initial infected count.
    pub fn with_infected(mut self, i0: f64) -> Self {
        self.i0 = i0;
        self
    }

    /// Sets the horizon.
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Total population N = S0 + I0.
    pub fn population(&self) -> f64 {
        self.s0 + self.i0
    }

    /// Basic reproduction number R0 = β / γ, or `None` when γ is zero.
    pub fn basic_reproduction_number(&self) -> Option<f64> {
        if self.gamma == 0.0 {
            None
        } else {
            Some(self.beta / self.gamma)
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        default_parameters()
    }
}

/// The parameter set a fresh session (or a reset) starts from.
pub fn default_parameters() -> SimulationParameters {
    SimulationParameters::new(
        DEFAULT_BETA,
        DEFAULT_GAMMA,
        DEFAULT_SUSCEPTIBLE,
        DEFAULT_INFECTED,
        DEFAULT_DAYS,
    )
}

/// One of the three model compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
}

impl Compartment {
    /// All compartments in plotting order.
    pub const ALL: [Compartment; 3] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
    ];

    /// Single-letter symbol (S, I, R).
    pub fn symbol(&self) -> char {
        match self {
            Compartment::Susceptible => 'S',
            Compartment::Infected => 'I',
            Compartment::Recovered => 'R',
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Infected => "Infected",
            Compartment::Recovered => "Recovered",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.symbol())
    }
}

/// State of all three compartments on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirPoint {
    pub day: usize,
    pub s: f64,
    pub i: f64,
    pub r: f64,
}

impl SirPoint {
    /// Day-zero state: everyone is susceptible or infected.
    pub fn initial(params: &SimulationParameters) -> Self {
        Self {
            day: 0,
            s: params.s0,
            i: params.i0,
            r: 0.0,
        }
    }

    /// Sum of the three compartments.
    pub fn total(&self) -> f64 {
        self.s + self.i + self.r
    }

    /// False once any compartment has overflowed to ±inf or NaN.
    pub fn is_finite(&self) -> bool {
        self.s.is_finite() && self.i.is_finite() && self.r.is_finite()
    }

    /// One Euler step of unit length.
    ///
    /// `new_infections` is evaluated once from this (previous-day) state and
    /// applied to both S and I, so the S and I changes cancel exactly apart
    /// from the recovery flow mirrored into R.
    fn advance(&self, beta: f64, gamma: f64, population: f64) -> Self {
        let new_infections = beta * self.s * self.i / population;
        let new_recoveries = gamma * self.i;

        Self {
            day: self.day + 1,
            s: self.s - new_infections,
            i: self.i + new_infections - new_recoveries,
            r: self.r + new_recoveries,
        }
    }
}

/// Result of one simulation run: three equal-length daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    susceptible: Vec<f64>,
    infected: Vec<f64>,
    recovered: Vec<f64>,
    population: f64,
}

impl Trajectory {
    fn with_capacity(days: usize, population: f64) -> Self {
        Self {
            susceptible: Vec::with_capacity(days),
            infected: Vec::with_capacity(days),
            recovered: Vec::with_capacity(days),
            population,
        }
    }

    fn push(&mut self, point: SirPoint) {
        self.susceptible.push(point.s);
        self.infected.push(point.i);
        self.recovered.push(point.r);
    }

    /// Susceptible series S[t].
    pub fn susceptible(&self) -> &[f64] {
        &self.susceptible
    }

    /// Infected series I[t].
    pub fn infected(&self) -> &[f64] {
        &self.infected
    }

    /// Recovered series R[t].
    pub fn recovered(&self) -> &[f64] {
        &self.recovered
    }

    /// Series for the given compartment.
    pub fn series(&self, compartment: Compartment) -> &[f64] {
        match compartment {
            Compartment::Susceptible => &self.susceptible,
            Compartment::Infected => &self.infected,
            Compartment::Recovered => &self.recovered,
        }
    }

    /// Total population N = S0 + I0 the run was normalised by.
    pub fn population(&self) -> f64 {
        self.population
    }

    /// Number of days (points per series).
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    /// State on day `t`, if within the horizon.
    pub fn point(&self, day: usize) -> Option<SirPoint> {
        Some(SirPoint {
            day,
            s: *self.susceptible.get(day)?,
            i: *self.infected.get(day)?,
            r: *self.recovered.get(day)?,
        })
    }

    /// Iterates over every day in order.
    pub fn points(&self) -> impl Iterator<Item = SirPoint> + '_ {
        (0..self.len()).filter_map(move |day| self.point(day))
    }

    /// State on the last day.
    pub fn last(&self) -> Option<SirPoint> {
        self.len().checked_sub(1).and_then(|day| self.point(day))
    }
}

/// Runs the SIR recurrence for `params.days` days.
///
/// # Errors
/// * [`SimulationError::DegenerateParameters`] if S0 + I0 is not a positive
///   finite number.
/// * [`SimulationError::EmptyHorizon`] if `days` is zero.
pub fn simulate(params: &SimulationParameters) -> Result<Trajectory, SimulationError> {
    let population = params.population();
    if !(population > 0.0 && population.is_finite()) {
        return Err(SimulationError::degenerate(population));
    }
    if params.days == 0 {
        return Err(SimulationError::EmptyHorizon);
    }

    let (beta, gamma) = (params.beta, params.gamma);
    let steps = std::iter::successors(Some(SirPoint::initial(params)), |prev| {
        Some(prev.advance(beta, gamma, population))
    });

    let mut trajectory = Trajectory::with_capacity(params.days, population);
    for point in steps.take(params.days) {
        trajectory.push(point);
    }

    Ok(trajectory)
}
