//! Scenario runner - executes parameter presets and checks their invariants.

use crate::scenarios::ScenarioId;

use serde::Serialize;
use sir_core::{
    check_invariants, simulate, InvariantReport, SimulationError, SimulationParameters, Trajectory,
    TrajectorySummary, DEFAULT_TOLERANCE,
};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario name ("custom" for ad-hoc parameters)
    pub name: String,

    /// Preset that was run, if any
    #[serde(skip)]
    pub scenario: Option<ScenarioId>,

    /// Parameters the engine was called with
    pub parameters: SimulationParameters,

    /// Whether all assertions held
    pub passed: bool,

    /// Summary of the trajectory, absent if the engine rejected the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TrajectorySummary>,

    /// Invariant check outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invariants: Option<InvariantReport>,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Engine error, if the parameters were rejected
    #[serde(skip)]
    pub error: Option<SimulationError>,

    /// The computed trajectory, kept for export and plotting
    #[serde(skip)]
    pub trajectory: Option<Trajectory>,
}

impl ScenarioResult {
    fn failed(mut self, reason: impl Into<String>) -> Self {
        self.passed = false;
        self.failure_reason = Some(reason.into());
        self
    }
}

/// Runs scenarios against the engine.
pub struct ScenarioRunner {
    /// Relative tolerance for the conservation check
    tolerance: f64,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Creates a runner with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the relative conservation tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Runs a preset and checks its expectations.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} - {}", scenario.name(), scenario.description());

        let params = scenario.parameters();
        let mut result = self.evaluate(scenario.name(), params);
        result.scenario = Some(scenario);

        if scenario.expects_error() {
            return match result.error {
                Some(e) if e.is_degenerate() => ScenarioResult {
                    passed: true,
                    failure_reason: None,
                    ..result
                },
                Some(_) => result,
                None => result.failed("expected the engine to reject a degenerate population"),
            };
        }
        if !result.passed {
            return result;
        }

        let physical = result.summary.is_some_and(|s| s.is_physical());
        if scenario.expects_nonphysical() && physical {
            return result.failed("expected the Euler step to overshoot [0, N]");
        }
        if !scenario.expects_nonphysical() && !physical {
            return result.failed("trajectory left [0, N] unexpectedly");
        }

        result
    }

    /// Runs every preset in order.
    pub fn run_all(&self) -> Vec<ScenarioResult> {
        ScenarioId::all().into_iter().map(|s| self.run(s)).collect()
    }

    /// Runs ad-hoc parameters. Non-physical output is reported but not a failure.
    pub fn run_parameters(&self, params: SimulationParameters) -> ScenarioResult {
        info!(
            "Running custom parameters: beta={} gamma={} S0={} I0={} days={}",
            params.beta, params.gamma, params.s0, params.i0, params.days
        );
        self.evaluate("custom", params)
    }

    fn evaluate(&self, name: &str, params: SimulationParameters) -> ScenarioResult {
        let result = ScenarioResult {
            name: name.to_string(),
            scenario: None,
            parameters: params,
            passed: true,
            summary: None,
            invariants: None,
            failure_reason: None,
            error: None,
            trajectory: None,
        };

        let trajectory = match simulate(&params) {
            Ok(trajectory) => trajectory,
            Err(e) => {
                debug!("Engine rejected parameters: {}", e);
                return ScenarioResult {
                    error: Some(e),
                    ..result
                }
                .failed(e.to_string());
            }
        };

        let summary = TrajectorySummary::from_trajectory(&params, &trajectory);
        let report = check_invariants(&params, &trajectory, self.tolerance);

        debug!(
            "peak I={:.2} on day {} | attack rate {:.3} | checked {} days",
            summary.peak_infected, summary.peak_day, summary.attack_rate, trajectory.len()
        );
        if let Some(day) = summary.first_nonphysical_day {
            warn!(
                "Trajectory leaves [0, N] on {} day(s), first on day {} (Euler step artifact)",
                summary.nonphysical_days, day
            );
        }
        if report.non_finite_days > 0 {
            warn!(
                "Trajectory overflowed on {} day(s); those days are not checked",
                report.non_finite_days
            );
        }
        if report.monotonicity_skipped_days > 0 {
            debug!(
                "R monotonicity not checked on {} day(s) with negative I",
                report.monotonicity_skipped_days
            );
        }

        let failure = report.first_violation().map(|v| v.to_string());
        let result = ScenarioResult {
            summary: Some(summary),
            invariants: Some(report),
            trajectory: Some(trajectory),
            ..result
        };

        match failure {
            Some(reason) => result.failed(reason),
            None => result,
        }
    }
}
