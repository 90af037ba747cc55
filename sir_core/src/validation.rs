//! Validation Module - Invariant Checks for Simulated Trajectories
//! ===============================================================
//!
//! Checks a trajectory against the properties every run must satisfy:
//! - Initial condition: S[0] = S0, I[0] = I0, R[0] = 0
//! - Length: each series holds exactly `days` points
//! - Conservation: S[t] + I[t] + R[t] = N within a relative tolerance
//! - Recovered monotonicity: R never decreases while I[t-1] ≥ 0 and γ ≥ 0
//!
//! Once I has gone negative (Euler overshoot) the recovery flow γ·I is
//! negative too, so R may legitimately fall. Such days are skipped and
//! counted rather than reported as violations.
//!
//! A strongly overshooting run keeps growing until it overflows to ±inf and
//! then NaN. Days with a non-finite compartment carry no arithmetic to check:
//! they are excluded from conservation and monotonicity and counted in
//! [`InvariantReport::non_finite_days`].
//!
//! Usage:
//! ```
//! use sir_core::{check_invariants, default_parameters, simulate, DEFAULT_TOLERANCE};
//!
//! let params = default_parameters();
//! let trajectory = simulate(&params).unwrap();
//! let report = check_invariants(&params, &trajectory, DEFAULT_TOLERANCE);
//! assert!(report.is_ok());
//! ```

use crate::model::{Compartment, SimulationParameters, Trajectory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative tolerance used for conservation checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A single broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Day-zero value differs from the parameter it should equal
    InitialCondition {
        compartment: Compartment,
        expected: f64,
        actual: f64,
    },

    /// Series length differs from the horizon
    Length {
        compartment: Compartment,
        expected: usize,
        actual: usize,
    },

    /// S + I + R drifted away from N
    Conservation { day: usize, total: f64, expected: f64 },

    /// R decreased although the previous infected count was non-negative
    RecoveredDecreased { day: usize, previous: f64, current: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InitialCondition { compartment, expected, actual } => {
                write!(f, "{} on day 0 is {} (expected {})", compartment, actual, expected)
            }
            Violation::Length { compartment, expected, actual } => {
                write!(f, "{} series has {} points (expected {})", compartment, actual, expected)
            }
            Violation::Conservation { day, total, expected } => {
                write!(f, "S + I + R on day {} is {} (expected {})", day, total, expected)
            }
            Violation::RecoveredDecreased { day, previous, current } => {
                write!(f, "R fell from {} to {} on day {}", previous, current, day)
            }
        }
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of [`check_invariants`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvariantReport {
    /// Every violation found, in day order per check
    pub violations: Vec<Violation>,

    /// Days on which R monotonicity was checked
    pub monotonicity_checked_days: usize,

    /// Days skipped because I[t-1] < 0 (Euler overshoot boundary)
    pub monotonicity_skipped_days: usize,

    /// Days on which S, I or R had overflowed to ±inf or NaN
    pub non_finite_days: usize,
}

impl InvariantReport {
    /// True if no invariant was violated.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// First violation, if any.
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Checks `trajectory` against the invariants implied by `params`.
///
/// Conservation uses a relative tolerance scaled by the larger of N and
/// |S| + |I| + |R|, so that overshooting runs with large opposite-sign
/// compartments are judged against the magnitude actually summed.
pub fn check_invariants(
    params: &SimulationParameters,
    trajectory: &Trajectory,
    tolerance: f64,
) -> InvariantReport {
    let mut report = InvariantReport::default();

    for compartment in Compartment::ALL {
        let actual = trajectory.series(compartment).len();
        if actual != params.days {
            report.violations.push(Violation::Length {
                compartment,
                expected: params.days,
                actual,
            });
        }
    }

    let expected_initial = [params.s0, params.i0, 0.0];
    for (compartment, expected) in Compartment::ALL.into_iter().zip(expected_initial) {
        if let Some(&actual) = trajectory.series(compartment).first() {
            if actual != expected {
                report.violations.push(Violation::InitialCondition {
                    compartment,
                    expected,
                    actual,
                });
            }
        }
    }

    let expected_total = params.population();
    for point in trajectory.points() {
        if !point.is_finite() {
            report.non_finite_days += 1;
            continue;
        }
        let total = point.total();
        let scale = expected_total.abs().max(point.s.abs() + point.i.abs() + point.r.abs());
        if !((total - expected_total).abs() <= tolerance * scale) {
            report.violations.push(Violation::Conservation {
                day: point.day,
                total,
                expected: expected_total,
            });
        }
    }

    let infected = trajectory.infected();
    let recovered = trajectory.recovered();
    for day in 1..recovered.len().min(infected.len()) {
        let finite = infected[day - 1].is_finite()
            && recovered[day - 1].is_finite()
            && recovered[day].is_finite();
        if params.gamma < 0.0 || !finite || infected[day - 1] < 0.0 {
            report.monotonicity_skipped_days += 1;
            continue;
        }
        report.monotonicity_checked_days += 1;
        if recovered[day] < recovered[day - 1] {
            report.violations.push(Violation::RecoveredDecreased {
                day,
                previous: recovered[day - 1],
                current: recovered[day],
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_parameters, simulate};

    #[test]
    fn test_reference_run_satisfies_invariants() {
        let params = default_parameters();
        let trajectory = simulate(&params).unwrap();
        let report = check_invariants(&params, &trajectory, DEFAULT_TOLERANCE);

        assert!(report.is_ok(), "unexpected violations: {:?}", report.violations);
        assert_eq!(report.monotonicity_checked_days, params.days - 1);
        assert_eq!(report.monotonicity_skipped_days, 0);
    }

    #[test]
    fn test_overshoot_still_conserves_population() {
        let params = SimulationParameters::new(3.0, 0.1, 500.0, 500.0, 30);
        let trajectory = simulate(&params).unwrap();
        let report = check_invariants(&params, &trajectory, DEFAULT_TOLERANCE);

        assert!(report.is_ok(), "unexpected violations: {:?}", report.violations);
    }

    #[test]
    fn test_negative_infected_boundary_is_skipped() {
        // γ > 1 makes I negative on day 1, so R falls on day 2 by construction
        let params = SimulationParameters::new(0.0, 1.5, 900.0, 100.0, 4);
        let trajectory = simulate(&params).unwrap();
        let report = check_invariants(&params, &trajectory, DEFAULT_TOLERANCE);

        assert!(report.is_ok(), "unexpected violations: {:?}", report.violations);
        assert_eq!(report.monotonicity_checked_days, 2);
        assert_eq!(report.monotonicity_skipped_days, 1);
    }

    #[test]
    fn test_overflowing_run_excludes_non_finite_days() {
        // S and I overflow to ±inf on day 8 and turn NaN shortly after
        let params = SimulationParameters::new(1000.0, 0.1, 990.0, 10.0, 60);
        let trajectory = simulate(&params).unwrap();
        let report = check_invariants(&params, &trajectory, DEFAULT_TOLERANCE);

        assert!(report.is_ok(), "unexpected violations: {:?}", report.violations);
        assert!(report.non_finite_days > 40);
        assert!(report.non_finite_days < params.days);
        assert_eq!(
            report.monotonicity_checked_days + report.monotonicity_skipped_days,
            params.days - 1
        );
    }

    #[test]
    fn test_mismatched_parameters_are_reported() {
        let params = default_parameters().with_days(10);
        let trajectory = simulate(&params).unwrap();

        let other = params.with_susceptible(991.0).with_days(12);
        let report = check_invariants(&other, &trajectory, DEFAULT_TOLERANCE);

        assert!(!report.is_ok());
        assert!(report.violations.iter().any(|v| matches!(
            v,
            Violation::Length { compartment: Compartment::Recovered, expected: 12, actual: 10 }
        )));
        assert!(matches!(
            report.violations.iter().find(|v| matches!(v, Violation::InitialCondition { .. })),
            Some(Violation::InitialCondition { compartment: Compartment::Susceptible, .. })
        ));
        assert!(report.violations.iter().any(|v| matches!(v, Violation::Conservation { day: 0, .. })));
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::RecoveredDecreased { day: 3, previous: 2.0, current: 1.5 };
        assert_eq!(violation.to_string(), "R fell from 2 to 1.5 on day 3");

        let violation = Violation::Conservation { day: 1, total: 999.0, expected: 1000.0 };
        assert_eq!(violation.to_string(), "S + I + R on day 1 is 999 (expected 1000)");
    }
}
