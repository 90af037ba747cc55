//! Named parameter presets.

use sir_core::{default_parameters, SimulationParameters};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SIR-001: Reference defaults (β=0.3, γ=0.1, 990 + 10, 160 days)
    Baseline,

    /// SIR-002: High transmission, short infectious period
    FastSpread,

    /// SIR-003: R0 just above one
    SlowSpread,

    /// SIR-004: One-day horizon, initial point only
    SingleDay,

    /// SIR-005: β = 0, infection only decays
    NoTransmission,

    /// SIR-006: Full-year horizon at the slider maximum
    LongHorizon,

    // ═══════════════════════════════════════════════════
    // BOUNDARY SCENARIOS - outside the recommended ranges
    // ═══════════════════════════════════════════════════

    /// SIR-007: β·I/N > 1 drives S negative (Euler artifact)
    EulerOvershoot,

    /// SIR-008: Empty population, must be rejected
    Degenerate,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::FastSpread,
            ScenarioId::SlowSpread,
            ScenarioId::SingleDay,
            ScenarioId::NoTransmission,
            ScenarioId::LongHorizon,
            ScenarioId::EulerOvershoot,
            ScenarioId::Degenerate,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::FastSpread => "fast_spread",
            ScenarioId::SlowSpread => "slow_spread",
            ScenarioId::SingleDay => "single_day",
            ScenarioId::NoTransmission => "no_transmission",
            ScenarioId::LongHorizon => "long_horizon",
            ScenarioId::EulerOvershoot => "euler_overshoot",
            ScenarioId::Degenerate => "degenerate",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "Reference defaults, R0 = 3 over 160 days",
            ScenarioId::FastSpread => "beta=0.9, gamma=0.3: sharp early peak",
            ScenarioId::SlowSpread => "beta=0.12, gamma=0.1: long shallow wave",
            ScenarioId::SingleDay => "days=1: only the initial point is returned",
            ScenarioId::NoTransmission => "beta=0: infected decay geometrically, S constant",
            ScenarioId::LongHorizon => "Reference rates over 365 days",
            ScenarioId::EulerOvershoot => "beta=3 with half the population infected: S goes negative",
            ScenarioId::Degenerate => "S0 = I0 = 0: population is empty",
        }
    }

    /// Parameter set for this scenario.
    pub fn parameters(&self) -> SimulationParameters {
        let base = default_parameters();
        match self {
            ScenarioId::Baseline => base,
            ScenarioId::FastSpread => base.with_beta(0.9).with_gamma(0.3),
            ScenarioId::SlowSpread => base.with_beta(0.12).with_gamma(0.1).with_days(365),
            ScenarioId::SingleDay => base.with_days(1),
            ScenarioId::NoTransmission => base.with_beta(0.0).with_days(60),
            ScenarioId::LongHorizon => base.with_days(365),
            ScenarioId::EulerOvershoot => SimulationParameters::new(3.0, 0.1, 500.0, 500.0, 60),
            ScenarioId::Degenerate => base.with_susceptible(0.0).with_infected(0.0).with_days(10),
        }
    }

    /// True if the engine must reject this scenario.
    pub fn expects_error(&self) -> bool {
        matches!(self, ScenarioId::Degenerate)
    }

    /// True if the trajectory is expected to leave the range [0, N].
    pub fn expects_nonphysical(&self) -> bool {
        matches!(self, ScenarioId::EulerOvershoot)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "default" | "sir-001" => Ok(ScenarioId::Baseline),
            "fast_spread" | "fastspread" | "fast" | "sir-002" => Ok(ScenarioId::FastSpread),
            "slow_spread" | "slowspread" | "slow" | "sir-003" => Ok(ScenarioId::SlowSpread),
            "single_day" | "singleday" | "sir-004" => Ok(ScenarioId::SingleDay),
            "no_transmission" | "notransmission" | "sir-005" => Ok(ScenarioId::NoTransmission),
            "long_horizon" | "longhorizon" | "sir-006" => Ok(ScenarioId::LongHorizon),
            "euler_overshoot" | "eulerovershoot" | "overshoot" | "sir-007" => Ok(ScenarioId::EulerOvershoot),
            "degenerate" | "sir-008" => Ok(ScenarioId::Degenerate),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>(), Ok(scenario));
            assert_eq!(scenario.to_string(), scenario.name());
        }
        assert_eq!("SIR-007".parse::<ScenarioId>(), Ok(ScenarioId::EulerOvershoot));
        assert!("time_warp".parse::<ScenarioId>().is_err());
    }

    #[test]
    fn test_only_degenerate_expects_error() {
        let erroring: Vec<_> = ScenarioId::all().into_iter().filter(|s| s.expects_error()).collect();
        assert_eq!(erroring, vec![ScenarioId::Degenerate]);
        assert_eq!(ScenarioId::Degenerate.parameters().population(), 0.0);
    }

    #[test]
    fn test_baseline_is_default() {
        assert_eq!(ScenarioId::Baseline.parameters(), default_parameters());
        assert_eq!(ScenarioId::SingleDay.parameters().days, 1);
    }
}
