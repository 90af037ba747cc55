//! SIR Simulator CLI
//!
//! Run the SIR engine on custom parameters, named scenarios, or a replayed
//! stream of slider events.

use clap::Parser;
use sir_sim::scenarios::ScenarioId;
use sir_sim::{
    render_chart, replay, Controller, ParameterEvent, ParameterOverrides, RecordingRenderer,
    Renderer, ScenarioResult, ScenarioRunner, SimConfig, TextRenderer, TrajectoryExport,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// SIR epidemic simulator
#[derive(Parser, Debug)]
#[command(name = "sir-sim")]
#[command(about = "Simulate a discrete-time SIR epidemic", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Transmission rate β
    #[arg(long)]
    beta: Option<f64>,

    /// Recovery rate γ
    #[arg(long)]
    gamma: Option<f64>,

    /// Initial susceptible count S0
    #[arg(long)]
    s0: Option<f64>,

    /// Initial infected count I0
    #[arg(long)]
    i0: Option<f64>,

    /// Horizon in days
    #[arg(long)]
    days: Option<usize>,

    /// Scenario to run (baseline, fast_spread, slow_spread, single_day,
    /// no_transmission, long_horizon, euler_overshoot, degenerate, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Replay a JSON array of parameter events through the controller
    #[arg(long)]
    events: Option<String>,

    /// Export the trajectory to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Write the trajectory as CSV to stdout
    #[arg(long)]
    csv: bool,

    /// Draw an ASCII chart
    #[arg(long)]
    plot: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let overrides = ParameterOverrides {
        beta: args.beta,
        gamma: args.gamma,
        s0: args.s0,
        i0: args.i0,
        days: args.days,
    };
    if args.scenario.is_some() && !overrides.is_empty() {
        eprintln!(
            "Error: {} cannot be combined with --scenario; presets fix their own parameters",
            overrides.names().join(", ")
        );
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => SimConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => SimConfig::default(),
    }
    .with_overrides(&overrides);

    if let Some(path) = &args.events {
        let code = replay_events(&config, path, args.plot);
        std::process::exit(code);
    }

    let runner = ScenarioRunner::new().with_tolerance(config.tolerance);

    let results: Vec<ScenarioResult> = match &args.scenario {
        Some(name) if name == "all" => {
            if args.export.is_some() || args.csv {
                eprintln!("Error: --export and --csv only support a single scenario, not 'all'");
                std::process::exit(1);
            }
            runner.run_all()
        }
        Some(name) => {
            let scenario: ScenarioId = name.parse().unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: {}, all", scenario_names());
                std::process::exit(1);
            });
            vec![runner.run(scenario)]
        }
        None => vec![runner.run_parameters(config.parameters)],
    };

    if let [result] = results.as_slice() {
        if let Some(trajectory) = &result.trajectory {
            if args.plot {
                print!(
                    "{}",
                    render_chart(&result.parameters, trajectory, config.plot_width, config.plot_height)
                );
            }

            let export = TrajectoryExport::new(&result.name, &result.parameters, trajectory);
            if args.csv {
                print!("{}", export.to_csv());
            }
            if let Some(path) = &args.export {
                match export.write_to_file(path) {
                    Ok(()) => info!("Exported {} days to {}", export.frames.len(), path),
                    Err(e) => {
                        error!("Failed to write export: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    let failed_count = results.iter().filter(|r| !r.passed).count();
    report(&results, args.json);

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}

fn scenario_names() -> String {
    ScenarioId::all()
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Feeds recorded events through a spawned controller and reports the final frame.
fn replay_events(config: &SimConfig, path: &str, plot: bool) -> i32 {
    let events: Vec<ParameterEvent> = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: cannot read events from {}: {}", path, e);
            return 1;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return 1;
        }
    };

    info!("Replaying {} events from {}", events.len(), path);
    let controller = Controller::with_bounds(RecordingRenderer::default(), config.bounds)
        .with_parameters(config.parameters);
    let controller = match runtime.block_on(replay(controller, events, config.channel_capacity)) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let in_sync = controller.shows_current_parameters();

    let params = controller.parameters();
    info!(
        "Final parameters: beta={} gamma={} S0={} I0={} days={} ({} renders)",
        params.beta,
        params.gamma,
        params.s0,
        params.i0,
        params.days,
        controller.render_count()
    );

    let renderer = controller.into_renderer();
    for (params, e) in &renderer.errors {
        error!("Rejected beta={} gamma={} S0={} I0={}: {}", params.beta, params.gamma, params.s0, params.i0, e);
    }

    if plot {
        if let Some(frame) = renderer.current() {
            let mut text = TextRenderer::new(std::io::stdout()).with_size(config.plot_width, config.plot_height);
            text.render(&frame.params, &frame.trajectory);
        }
    }

    if in_sync {
        0
    } else {
        1
    }
}

fn report(results: &[ScenarioResult], json: bool) {
    let total = results.len();
    let failed_count = results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;

    if json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode results: {}", e),
        }
        return;
    }

    for result in results {
        if result.passed {
            match &result.summary {
                Some(summary) => info!(
                    "✓ {} PASSED | peak I={:.1} on day {} | final R={:.1} ({:.1}% of N)",
                    result.name,
                    summary.peak_infected,
                    summary.peak_day,
                    summary.final_recovered,
                    summary.attack_rate * 100.0
                ),
                None => info!("✓ {} PASSED (rejected as expected)", result.name),
            }
        } else {
            error!(
                "✗ {} FAILED: {}",
                result.name,
                result.failure_reason.as_deref().unwrap_or("unknown")
            );
        }
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if failed_count == 0 {
        info!("✅ All {} run(s) passed!", total);
    } else {
        error!("❌ {}/{} run(s) failed!", failed_count, total);
    }
}
