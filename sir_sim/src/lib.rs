//! SIR Simulation Harness
//!
//! Everything around the pure engine in `sir_core`:
//! - **Controller**: folds slider/button events into a full parameter set,
//!   re-runs the engine and forwards each trajectory to a renderer
//! - **Scenarios**: named parameter presets, including the known
//!   degenerate and Euler-overshoot cases
//! - **Runner**: executes scenarios and checks the trajectory invariants
//! - **Exporter**: JSON and CSV output of a run
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ParameterEvent   ┌──────────────┐  Trajectory  ┌──────────┐
//! │ input source │ ────────────────► │  Controller  │ ───────────► │ Renderer │
//! │ (sliders,    │   (mpsc channel)  │  simulate()  │              │          │
//! │  replay)     │                   └──────────────┘              └──────────┘
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use sir_sim::{Controller, ParameterEvent, RecordingRenderer};
//!
//! let mut controller = Controller::new(RecordingRenderer::default());
//! controller.start().unwrap();
//! controller.handle(ParameterEvent::Beta(0.5)).unwrap();
//!
//! assert_eq!(controller.renderer().frames.len(), 2);
//! ```

pub mod bounds;
pub mod config;
pub mod controller;
pub mod exporter;
pub mod render;
pub mod runner;
pub mod scenarios;

pub use bounds::{ParameterBounds, SliderSpec};
pub use config::{ConfigError, ParameterOverrides, SimConfig};
pub use controller::{replay, spawn_controller, Controller, ControllerError, ControllerHandle, ParameterEvent};
pub use exporter::{DayFrame, ExportError, TrajectoryExport};
pub use render::{render_chart, Frame, RecordingRenderer, Renderer, TextRenderer};
pub use runner::{ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
