//! Interaction controller - turns input events into re-rendered trajectories.
//!
//! Each event is folded into a complete [`SimulationParameters`] value which is
//! handed to a single entry point, [`Controller::on_parameters_changed`]. There
//! is no shared figure state: the controller owns the current parameters and
//! its renderer, and input sources talk to it only by sending events.

use crate::bounds::ParameterBounds;
use crate::render::{RecordingRenderer, Renderer};
use serde::{Deserialize, Serialize};
use sir_core::{simulate, SimulationError, SimulationParameters};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

/// A user input.
///
/// Slider variants carry the raw slider position; it is clamped and snapped
/// through [`ParameterBounds`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ParameterEvent {
    Beta(f64),
    Gamma(f64),
    Susceptible(f64),
    Infected(f64),
    Days(f64),

    /// Reset button: every slider back to its initial position
    Reset,

    /// Programmatic replacement of the whole parameter set (not snapped)
    Replace(SimulationParameters),
}

impl ParameterEvent {
    /// Produces the full parameter set that results from this event.
    pub fn apply(self, current: SimulationParameters, bounds: &ParameterBounds) -> SimulationParameters {
        match self {
            ParameterEvent::Beta(raw) => current.with_beta(bounds.beta.apply(raw)),
            ParameterEvent::Gamma(raw) => current.with_gamma(bounds.gamma.apply(raw)),
            ParameterEvent::Susceptible(raw) => current.with_susceptible(bounds.susceptible.apply(raw)),
            ParameterEvent::Infected(raw) => current.with_infected(bounds.infected.apply(raw)),
            ParameterEvent::Days(raw) => current.with_days(bounds.apply_days(raw)),
            ParameterEvent::Reset => bounds.initial_parameters(),
            ParameterEvent::Replace(params) => params,
        }
    }
}

/// Owns the current parameters and re-renders on every change.
pub struct Controller<R: Renderer> {
    params: SimulationParameters,
    bounds: ParameterBounds,
    renderer: R,
    renders: u64,
}

impl<R: Renderer> Controller<R> {
    /// Creates a controller at the default parameters and slider bounds.
    pub fn new(renderer: R) -> Self {
        Self::with_bounds(renderer, ParameterBounds::default())
    }

    /// Creates a controller starting from the initial positions of `bounds`.
    pub fn with_bounds(renderer: R, bounds: ParameterBounds) -> Self {
        Self {
            params: bounds.initial_parameters(),
            bounds,
            renderer,
            renders: 0,
        }
    }

    /// Starts from `params` instead of the slider initial positions.
    pub fn with_parameters(mut self, params: SimulationParameters) -> Self {
        self.params = params;
        self
    }

    /// Draws the first frame for the current parameters.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        self.on_parameters_changed(self.params)
    }

    /// Applies one input event and re-renders.
    pub fn handle(&mut self, event: ParameterEvent) -> Result<(), SimulationError> {
        let next = event.apply(self.params, &self.bounds);
        self.on_parameters_changed(next)
    }

    /// Moves every slider back to its initial position and re-renders.
    ///
    /// With the default bounds this is [`sir_core::default_parameters`].
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.on_parameters_changed(self.bounds.initial_parameters())
    }

    /// The single entry point for every parameter change.
    ///
    /// On success the new trajectory replaces the previous frame. On failure
    /// the renderer is told about the error and keeps its previous frame; the
    /// parameters still move to `params` so the next slider event builds on
    /// what the user sees.
    pub fn on_parameters_changed(&mut self, params: SimulationParameters) -> Result<(), SimulationError> {
        self.params = params;
        match simulate(&params) {
            Ok(trajectory) => {
                self.renders += 1;
                debug!(
                    "render #{}: beta={} gamma={} S0={} I0={} days={}",
                    self.renders, params.beta, params.gamma, params.s0, params.i0, params.days
                );
                self.renderer.render(&params, &trajectory);
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous frame: {}", e);
                self.renderer.render_error(&params, &e);
                Err(e)
            }
        }
    }

    /// Current parameter set.
    pub fn parameters(&self) -> SimulationParameters {
        self.params
    }

    pub fn bounds(&self) -> &ParameterBounds {
        &self.bounds
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of successful renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

impl Controller<RecordingRenderer> {
    /// True if the last drawn frame belongs to the current parameters, i.e.
    /// the most recent change was not rejected.
    pub fn shows_current_parameters(&self) -> bool {
        self.renderer.current().map(|frame| frame.params) == Some(self.params)
    }
}

/// Errors from the channel front end.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller task has exited and no longer accepts events
    #[error("controller task has stopped")]
    Closed,

    /// The controller task panicked or was cancelled
    #[error("controller task failed: {0}")]
    Task(#[from] JoinError),
}

/// Sending side of a spawned controller. Cheap to clone, one per input source.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<ParameterEvent>,
}

impl ControllerHandle {
    /// Queues an event for the controller task.
    pub async fn send(&self, event: ParameterEvent) -> Result<(), ControllerError> {
        self.tx.send(event).await.map_err(|_| ControllerError::Closed)
    }
}

/// Runs `controller` on its own task, fed by a bounded channel.
///
/// Events that queue up while a render is in progress are folded together
/// and only the resulting parameter set is simulated, so rapid slider drags
/// never render superseded states. The task ends when every handle has been
/// dropped and returns the controller.
pub fn spawn_controller<R>(
    mut controller: Controller<R>,
    capacity: usize,
) -> (ControllerHandle, JoinHandle<Controller<R>>)
where
    R: Renderer + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<ParameterEvent>(capacity.max(1));

    let task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let mut next = event.apply(controller.params, &controller.bounds);
            let mut coalesced = 0usize;
            while let Ok(pending) = rx.try_recv() {
                next = pending.apply(next, &controller.bounds);
                coalesced += 1;
            }
            if coalesced > 0 {
                debug!("Coalesced {} superseded events", coalesced);
            }
            // Errors are already reported to the renderer.
            let _ = controller.on_parameters_changed(next);
        }
        controller
    });

    (ControllerHandle { tx }, task)
}

/// Draws the first frame, then feeds `events` through a spawned controller
/// and returns it once every event has been handled.
pub async fn replay<R, I>(
    mut controller: Controller<R>,
    events: I,
    capacity: usize,
) -> Result<Controller<R>, ControllerError>
where
    R: Renderer + Send + 'static,
    I: IntoIterator<Item = ParameterEvent>,
{
    // A rejected start is recorded by the renderer like any other error.
    let _ = controller.start();

    let (handle, task) = spawn_controller(controller, capacity);
    for event in events {
        if let Err(e) = handle.send(event).await {
            warn!("Failed to deliver event: {}", e);
            break;
        }
    }
    drop(handle);
    Ok(task.await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::SliderSpec;
    use approx::assert_relative_eq;
    use sir_core::default_parameters;

    #[test]
    fn test_start_renders_defaults() {
        let mut controller = Controller::new(RecordingRenderer::default());
        controller.start().unwrap();

        let frame = controller.renderer().current().unwrap();
        assert_eq!(frame.params, default_parameters());
        assert_eq!(frame.trajectory.len(), 160);
        assert_eq!(controller.render_count(), 1);
    }

    #[test]
    fn test_slider_events_snap_and_accumulate() {
        let mut controller = Controller::new(RecordingRenderer::default());

        controller.handle(ParameterEvent::Beta(0.45)).unwrap();
        controller.handle(ParameterEvent::Susceptible(500.7)).unwrap();
        controller.handle(ParameterEvent::Days(1000.0)).unwrap();

        let params = controller.parameters();
        assert_relative_eq!(params.beta, 0.45);
        assert_eq!(params.s0, 501.0);
        assert_eq!(params.days, 365);
        assert_eq!(params.gamma, 0.1);

        let frames = &controller.renderer().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].trajectory.len(), 365);
        assert_eq!(frames[2].trajectory.population(), 511.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut controller = Controller::new(RecordingRenderer::default());
        controller.handle(ParameterEvent::Gamma(0.4)).unwrap();
        controller.handle(ParameterEvent::Reset).unwrap();

        assert_eq!(controller.parameters(), default_parameters());
        controller.handle(ParameterEvent::Infected(50.0)).unwrap();
        controller.reset().unwrap();
        assert_eq!(controller.renderer().current().unwrap().params, default_parameters());
    }

    #[test]
    fn test_reset_uses_configured_initial_positions() {
        let mut bounds = ParameterBounds::default();
        bounds.beta = SliderSpec::continuous(0.1, 0.2, 0.15);
        bounds.susceptible = SliderSpec::stepped(0.0, 100.0, 10.0, 90.0);
        bounds.days = SliderSpec::stepped(5.0, 50.0, 5.0, 20.0);
        let initial = bounds.initial_parameters();

        let mut controller = Controller::with_bounds(RecordingRenderer::default(), bounds);
        controller.start().unwrap();
        controller.handle(ParameterEvent::Beta(0.2)).unwrap();
        controller.handle(ParameterEvent::Reset).unwrap();

        assert_eq!(controller.parameters(), initial);
        assert!(bounds.contains(&controller.parameters()));

        controller.handle(ParameterEvent::Days(50.0)).unwrap();
        controller.reset().unwrap();
        assert_eq!(controller.renderer().current().unwrap().params, initial);
    }

    #[test]
    fn test_degenerate_replace_keeps_previous_frame() {
        let mut controller = Controller::new(RecordingRenderer::default());
        controller.start().unwrap();

        let degenerate = SimulationParameters::new(0.3, 0.1, 0.0, 0.0, 10);
        let err = controller.handle(ParameterEvent::Replace(degenerate)).unwrap_err();

        assert!(err.is_degenerate());
        assert_eq!(controller.parameters(), degenerate);
        let renderer = controller.renderer();
        assert_eq!(renderer.frames.len(), 1);
        assert_eq!(renderer.current().unwrap().params, default_parameters());
        assert_eq!(renderer.errors.len(), 1);
    }

    #[test]
    fn test_event_json_format() {
        let events: Vec<ParameterEvent> = serde_json::from_str(
            r#"[{"event": "beta", "value": 0.5}, {"event": "reset"}, {"event": "days", "value": 30}]"#,
        )
        .unwrap();

        assert_eq!(
            events,
            vec![ParameterEvent::Beta(0.5), ParameterEvent::Reset, ParameterEvent::Days(30.0)]
        );
    }

    #[tokio::test]
    async fn test_spawned_controller_applies_events_in_order() {
        let controller = Controller::new(RecordingRenderer::default());
        let (handle, task) = spawn_controller(controller, 16);

        handle.send(ParameterEvent::Beta(0.9)).await.unwrap();
        handle.send(ParameterEvent::Gamma(0.2)).await.unwrap();
        handle.send(ParameterEvent::Days(30.0)).await.unwrap();
        drop(handle);

        let controller = task.await.unwrap();
        let expected = default_parameters().with_beta(0.9).with_gamma(0.2).with_days(30);
        assert_eq!(controller.parameters(), expected);

        let renderer = controller.into_renderer();
        assert!(!renderer.frames.is_empty() && renderer.frames.len() <= 3);
        assert_eq!(renderer.current().unwrap().params, expected);
    }

    #[tokio::test]
    async fn test_replay_ends_on_current_parameters() {
        let events = [ParameterEvent::Beta(0.5), ParameterEvent::Days(30.0)];
        let controller = replay(Controller::new(RecordingRenderer::default()), events, 4)
            .await
            .unwrap();

        assert_eq!(controller.parameters(), default_parameters().with_beta(0.5).with_days(30));
        assert!(controller.shows_current_parameters());
    }

    #[tokio::test]
    async fn test_replay_ending_on_rejected_parameters() {
        let degenerate = SimulationParameters::new(0.3, 0.1, 0.0, 0.0, 10);
        let events = [ParameterEvent::Beta(0.5), ParameterEvent::Replace(degenerate)];
        let controller = replay(Controller::new(RecordingRenderer::default()), events, 4)
            .await
            .unwrap();

        assert_eq!(controller.parameters(), degenerate);
        assert!(!controller.shows_current_parameters());
        assert!(!controller.renderer().errors.is_empty());
    }

    #[tokio::test]
    async fn test_replay_recovers_after_rejection() {
        let degenerate = SimulationParameters::new(0.3, 0.1, 0.0, 0.0, 10);
        let controller = Controller::new(RecordingRenderer::default()).with_parameters(degenerate);
        let controller = replay(controller, [ParameterEvent::Reset], 4).await.unwrap();

        assert_eq!(controller.renderer().errors.len(), 1);
        assert!(controller.shows_current_parameters());
    }

    #[tokio::test]
    async fn test_send_after_stop_fails() {
        let controller = Controller::new(RecordingRenderer::default());
        let (handle, task) = spawn_controller(controller, 1);
        task.abort();
        let _ = task.await;

        assert!(matches!(
            handle.send(ParameterEvent::Reset).await,
            Err(ControllerError::Closed)
        ));
    }
}
