//! Rendering surfaces for controller output.

use sir_core::{Compartment, SimulationError, SimulationParameters, Trajectory};
use std::io::Write;

/// Receives every trajectory the controller produces.
pub trait Renderer {
    /// Draws a fresh trajectory, replacing whatever was shown before.
    fn render(&mut self, params: &SimulationParameters, trajectory: &Trajectory);

    /// Called when the engine rejects `params`. The previous frame stays on screen.
    fn render_error(&mut self, _params: &SimulationParameters, _error: &SimulationError) {}
}

/// One rendered update.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub params: SimulationParameters,
    pub trajectory: Trajectory,
}

/// Keeps every frame and error it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
    pub errors: Vec<(SimulationParameters, SimulationError)>,
}

impl RecordingRenderer {
    /// Most recent frame, i.e. what a screen would currently show.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, params: &SimulationParameters, trajectory: &Trajectory) {
        self.frames.push(Frame {
            params: *params,
            trajectory: trajectory.clone(),
        });
    }

    fn render_error(&mut self, params: &SimulationParameters, error: &SimulationError) {
        self.errors.push((*params, *error));
    }
}

/// Draws an ASCII chart of each trajectory to a writer.
pub struct TextRenderer<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: 72,
            height: 20,
        }
    }

    /// Sets the plot area size in characters.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(2);
        self.height = height.max(2);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, params: &SimulationParameters, trajectory: &Trajectory) {
        let chart = render_chart(params, trajectory, self.width, self.height);
        if let Err(e) = self.out.write_all(chart.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to draw chart: {}", e);
        }
    }

    fn render_error(&mut self, params: &SimulationParameters, error: &SimulationError) {
        let line = format!(
            "cannot simulate beta={} gamma={} S0={} I0={} days={}: {}\n",
            params.beta, params.gamma, params.s0, params.i0, params.days, error
        );
        if let Err(e) = self.out.write_all(line.as_bytes()) {
            tracing::warn!("Failed to draw error: {}", e);
        }
    }
}

/// Renders `trajectory` as a `width` x `height` character plot.
///
/// The y axis spans 0..N and the x axis spans the horizon. Values outside
/// 0..N are pinned to the border rows; the data itself is left untouched.
/// Where curves overlap, later compartments (I over S, R over I) win.
pub fn render_chart(
    params: &SimulationParameters,
    trajectory: &Trajectory,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let population = trajectory.population();
    let mut grid = vec![vec![' '; width]; height];

    if !trajectory.is_empty() {
        let last_day = trajectory.len() - 1;
        for column in 0..width {
            let day = column * last_day / (width - 1);
            for compartment in Compartment::ALL {
                let value = trajectory.series(compartment)[day];
                let fraction = (value / population).max(0.0).min(1.0);
                let row = ((1.0 - fraction) * (height - 1) as f64).round() as usize;
                grid[row][column] = compartment.symbol();
            }
        }
    }

    let label_width = format!("{:.0}", population).len();
    let mut chart = String::new();
    chart.push_str(&format!(
        "SIR model (beta={:.3}, gamma={:.3}, S0={}, I0={})\n",
        params.beta, params.gamma, params.s0, params.i0
    ));
    for (index, row) in grid.iter().enumerate() {
        let label = if index == 0 {
            format!("{:.0}", population)
        } else if index == height - 1 {
            "0".to_string()
        } else {
            String::new()
        };
        chart.push_str(&format!("{:>w$} |", label, w = label_width));
        chart.extend(row.iter());
        chart.push('\n');
    }
    chart.push_str(&format!("{:>w$} +{}\n", "", "-".repeat(width), w = label_width));
    chart.push_str(&format!(
        "{:>w$}  day 0{:>pad$}\n",
        "",
        format!("day {}", trajectory.len().saturating_sub(1)),
        w = label_width,
        pad = width.saturating_sub(5),
    ));
    let legend: Vec<String> = Compartment::ALL.iter().map(|c| c.to_string()).collect();
    chart.push_str(&format!("legend: {}\n", legend.join(", ")));
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use sir_core::{default_parameters, simulate};

    #[test]
    fn test_chart_layout() {
        let params = default_parameters();
        let trajectory = simulate(&params).unwrap();
        let chart = render_chart(&params, &trajectory, 40, 10);
        let lines: Vec<&str> = chart.lines().collect();

        // title + 10 rows + axis + x labels + legend
        assert_eq!(lines.len(), 14);
        assert!(lines[0].starts_with("SIR model"));
        assert!(lines[1].starts_with("1000 |"));
        assert!(lines[10].starts_with("   0 |"));
        assert!(lines[13].contains("Recovered (R)"));
        assert!(lines[12].ends_with("day 159"));
    }

    #[test]
    fn test_day_zero_positions() {
        let params = default_parameters();
        let trajectory = simulate(&params).unwrap();
        let chart = render_chart(&params, &trajectory, 40, 10);
        let rows: Vec<&str> = chart.lines().skip(1).take(10).collect();
        let first_column = |row: &str| row.chars().nth(6).unwrap();

        // S0 = 990 of 1000 rounds to the top row, I0 and R0 to the bottom row
        assert_eq!(first_column(rows[0]), 'S');
        assert_eq!(first_column(rows[9]), 'R');
    }

    #[test]
    fn test_recording_renderer_keeps_frames() {
        let mut renderer = RecordingRenderer::default();
        let params = default_parameters().with_days(5);
        let trajectory = simulate(&params).unwrap();

        renderer.render(&params, &trajectory);
        renderer.render_error(&params, &SimulationError::EmptyHorizon);

        assert_eq!(renderer.frames.len(), 1);
        assert_eq!(renderer.current().unwrap().trajectory, trajectory);
        assert_eq!(renderer.errors, vec![(params, SimulationError::EmptyHorizon)]);
    }

    #[test]
    fn test_text_renderer_writes_chart() {
        let params = default_parameters().with_days(20);
        let trajectory = simulate(&params).unwrap();
        let mut renderer = TextRenderer::new(Vec::new()).with_size(30, 8);

        renderer.render(&params, &trajectory);
        renderer.render_error(&params.with_susceptible(0.0).with_infected(0.0), &SimulationError::degenerate(0.0));

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, format!(
            "{}cannot simulate beta=0.3 gamma=0.1 S0=0 I0=0 days=20: degenerate parameters: total population 0 must be positive\n",
            render_chart(&params, &trajectory, 30, 8)
        ));
    }
}
