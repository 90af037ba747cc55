//! SIR Core - Discrete-Time Epidemic Simulation Engine
//!
//! Computes the daily evolution of a Susceptible-Infected-Recovered population
//! with a forward-Euler recurrence of unit step:
//!
//! ```text
//! new_infections = β · S[t-1] · I[t-1] / N
//! new_recoveries = γ · I[t-1]
//! S[t] = S[t-1] - new_infections
//! I[t] = I[t-1] + new_infections - new_recoveries
//! R[t] = R[t-1] + new_recoveries
//! ```
//!
//! The engine is a pure function: every call allocates its own [`Trajectory`]
//! and the same [`SimulationParameters`] always produce bit-identical output.
//!
//! # Usage
//!
//! ```
//! use sir_core::{simulate, default_parameters};
//!
//! let trajectory = simulate(&default_parameters()).unwrap();
//! assert_eq!(trajectory.len(), 160);
//! assert_eq!(trajectory.recovered()[0], 0.0);
//! ```

pub mod error;
pub mod metrics;
pub mod model;
pub mod validation;

// Re-export key types for convenience
pub use error::SimulationError;
pub use metrics::TrajectorySummary;
pub use model::{default_parameters, simulate, Compartment, SimulationParameters, SirPoint, Trajectory};
pub use validation::{check_invariants, InvariantReport, Violation, DEFAULT_TOLERANCE};
