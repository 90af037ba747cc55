//! End-to-end scenario checks against the engine's documented behaviour.

use approx::assert_relative_eq;
use sir_core::{simulate, SimulationError, SimulationParameters};
use sir_sim::{ScenarioId, ScenarioRunner, TrajectoryExport};

#[test]
fn every_preset_passes() {
    let runner = ScenarioRunner::new();
    for scenario in ScenarioId::all() {
        let result = runner.run(scenario);
        assert!(result.passed, "{}: {:?}", scenario, result.failure_reason);
        assert_eq!(result.scenario, Some(scenario));
    }
}

#[test]
fn known_first_day_values() {
    let result = ScenarioRunner::new().run(ScenarioId::Baseline);
    let trajectory = result.trajectory.unwrap();

    assert_relative_eq!(trajectory.susceptible()[1], 987.03, epsilon = 1e-9);
    assert_relative_eq!(trajectory.infected()[1], 11.97, epsilon = 1e-9);
    assert_relative_eq!(trajectory.recovered()[1], 1.0, epsilon = 1e-9);
}

#[test]
fn single_day_returns_initial_point() {
    let result = ScenarioRunner::new().run(ScenarioId::SingleDay);
    let trajectory = result.trajectory.unwrap();

    assert_eq!(trajectory.susceptible(), &[990.0]);
    assert_eq!(trajectory.infected(), &[10.0]);
    assert_eq!(trajectory.recovered(), &[0.0]);
}

#[test]
fn degenerate_population_is_an_error() {
    let params = SimulationParameters::new(0.3, 0.1, 0.0, 0.0, 10);
    assert_eq!(
        simulate(&params),
        Err(SimulationError::DegenerateParameters { population: 0.0 })
    );
}

#[test]
fn parallel_runs_are_identical() {
    let params = ScenarioId::LongHorizon.parameters();
    let reference = simulate(&params).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || simulate(&params).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}

#[test]
fn export_matches_runner_summary() {
    let result = ScenarioRunner::new().run(ScenarioId::FastSpread);
    let trajectory = result.trajectory.as_ref().unwrap();
    let export = TrajectoryExport::new(&result.name, &result.parameters, trajectory);

    assert_eq!(export.frames.len(), trajectory.len());
    assert_eq!(Some(export.summary), result.summary);
    assert_eq!(export.summary.peak_day, 10);
}
