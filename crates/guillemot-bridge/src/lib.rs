//! # Guillemot Bridge
//!
//! Binds an editable configuration document to a live engine session and keeps the output
//! surface in sync with it, frame by frame.

pub mod clock;
pub mod reload;
pub mod render_loop;

use anyhow::Context;
use glam::Vec2;
use guillemot_core::{EngineFactory, FrameCounter, LiveConfig, SessionError, SessionHandle, spawn_session_thread};
use guillemot_surface::{InputTracker, OutputSurface, SharedInput, TextureHost};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub use clock::{FrameClock, IntervalClock};
pub use reload::{ConfigEditor, KeyAction, ReloadController, ReloadTrigger, TriggerSender};
pub use render_loop::{LoopStopper, RenderLoop, StepOutcome};

/// A running live-reload host.
///
/// It owns the session actor, the reload controller and the render loop, and exposes the event
/// entry points a host page wires its pointer, resize and submit events to.
pub struct LiveBridge<S> {
    session: SessionHandle,
    input: SharedInput,
    surface: Arc<S>,
    triggers: TriggerSender,
    stopper: LoopStopper,
    render_task: JoinHandle<Result<FrameCounter, SessionError>>,
    controller_task: JoinHandle<()>,
}

impl<S> LiveBridge<S>
where
    S: OutputSurface + TextureHost + 'static,
{
    /// Starts the session, the reload controller and the render loop, then queues the initial load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F: EngineFactory>(
        factory: F,
        editor: Arc<dyn ConfigEditor>,
        surface: Arc<S>,
        config: &LiveConfig,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let session =
            spawn_session_thread(factory, config).context("Failed to start engine session")?;

        let input = SharedInput::new(InputTracker::new(Vec2::from(config.initial_viewport)));
        input.refresh_viewport(&surface.bounding_box());

        let (triggers, trigger_rx) = reload::trigger_channel();
        reload::bind_reload_key(editor.as_ref(), &config.reload_chord, triggers.clone());

        let controller =
            ReloadController::new(session.clone(), editor, surface.clone(), input.clone());
        let controller_task = tokio::spawn(controller.run(trigger_rx));

        let render_loop = RenderLoop::new(
            session.clone(),
            input.clone(),
            surface.clone(),
            IntervalClock::new(config.refresh_hz),
        );
        let stopper = render_loop.stopper();
        let render_task = tokio::spawn(render_loop.run());

        triggers.full_update();
        tracing::info!(refresh_hz = config.refresh_hz, chord = %config.reload_chord, "Live bridge started");

        Ok(Self {
            session,
            input,
            surface,
            triggers,
            stopper,
            render_task,
            controller_task,
        })
    }

    /// Pointer moved to `client` (client coordinates).
    pub fn pointer_moved(&self, client: Vec2) {
        self.input
            .pointer_moved(client, &self.surface.bounding_box());
    }

    pub fn pointer_down(&self) {
        self.input.pointer_down();
    }

    pub fn pointer_up(&self) {
        self.input.pointer_up();
    }

    /// The host window was resized.
    pub fn resized(&self) {
        self.input.refresh_viewport(&self.surface.bounding_box());
    }

    /// The submit control was activated.
    pub fn submit(&self) {
        self.triggers.submit();
    }

    pub fn triggers(&self) -> TriggerSender {
        self.triggers.clone()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn input(&self) -> &SharedInput {
        &self.input
    }

    /// Stops the render loop, disposes the engine and returns the final frame counter.
    pub async fn shutdown(self) -> anyhow::Result<FrameCounter> {
        self.stopper.stop();
        let frames = self
            .render_task
            .await
            .context("Render loop task panicked")??;

        self.controller_task.abort();
        if let Err(err) = self.session.shutdown().await {
            tracing::debug!(error = %err, "Session already stopped");
        }

        tracing::info!(frames = frames.completed(), "Live bridge stopped");
        Ok(frames)
    }
}
