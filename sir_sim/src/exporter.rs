//! JSON and CSV exporter for simulated trajectories.

use serde::{Deserialize, Serialize};
use sir_core::{SimulationParameters, Trajectory, TrajectorySummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// State of the three compartments on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayFrame {
    pub day: usize,
    pub s: f64,
    pub i: f64,
    pub r: f64,
}

/// Complete record of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryExport {
    /// Scenario name
    pub scenario: String,

    /// Parameters used
    pub parameters: SimulationParameters,

    /// Total population N
    pub population: f64,

    /// One frame per day
    pub frames: Vec<DayFrame>,

    /// Derived statistics
    pub summary: TrajectorySummary,
}

impl TrajectoryExport {
    /// Builds an export from a finished run.
    pub fn new(scenario: &str, parameters: &SimulationParameters, trajectory: &Trajectory) -> Self {
        let frames = trajectory
            .points()
            .map(|p| DayFrame {
                day: p.day,
                s: p.s,
                i: p.i,
                r: p.r,
            })
            .collect();

        Self {
            scenario: scenario.to_string(),
            parameters: *parameters,
            population: trajectory.population(),
            frames,
            summary: TrajectorySummary::from_trajectory(parameters, trajectory),
        }
    }

    /// Renders the frames as `day,s,i,r` rows.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("day,s,i,r\n");
        for frame in &self.frames {
            csv.push_str(&format!("{},{},{},{}\n", frame.day, frame.s, frame.i, frame.r));
        }
        csv
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Writes the CSV rendering to a file.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_csv().as_bytes())?;
        Ok(())
    }
}
