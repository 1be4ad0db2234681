//! # Engine Session
//!
//! Owns at most one live engine instance and drives its lifecycle:
//! `Uninitialized -> Initializing -> Ready`. A failed construction returns the session to the
//! state it was in before, so a corrected configuration can retry from scratch. Engine panics are
//! caught at every call site and reported like ordinary failures.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{Engine, EngineFactory, FrameOutput, WorldFrame};
use crate::error::ConstructError;
use crate::events::{SessionEvent, SessionEventBus};

enum SessionState<E> {
    Uninitialized,
    Initializing,
    Ready(E),
}

/// Externally visible lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Uninitialized,
    Initializing,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    /// Frame-rate hint of the live instance. Metadata only, the render loop does not honor it.
    pub fps: Option<f64>,
}

/// The failed outcome of [`EngineSession::initialize`], carrying the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InitFailure(pub String);

/// The successful outcome of [`EngineSession::initialize`].
#[derive(Clone, Debug, PartialEq)]
pub struct InitReport {
    pub fps: f64,
    pub image_definitions: String,
}

/// Result of a reload. Reload itself never fails: every problem is carried in `message`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReloadOutcome {
    /// Message for the error slot. Empty means no error.
    pub message: String,
    /// True if this reload constructed the engine instance.
    pub initialized: bool,
    /// Image-definition markup, present only when `initialized` is true.
    pub image_definitions: Option<String>,
    /// True if the session holds a live instance after the reload.
    pub ready: bool,
}

/// Reply to a render request.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameReply {
    Rendered(FrameOutput),
    /// No live instance yet; nothing was forwarded.
    NotReady,
    /// Tick or draw failed for this frame only.
    Failed(String),
}

pub struct EngineSession<F: EngineFactory> {
    factory: F,
    state: SessionState<F::Engine>,
    fps: Option<f64>,
    events: SessionEventBus,
}

impl<F: EngineFactory> EngineSession<F> {
    pub fn new(factory: F, events: SessionEventBus) -> Self {
        Self {
            factory,
            state: SessionState::Uninitialized,
            fps: None,
            events,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Uninitialized => SessionStatus::Uninitialized,
            SessionState::Initializing => SessionStatus::Initializing,
            SessionState::Ready(_) => SessionStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            fps: self.fps,
        }
    }

    /// Constructs exactly one engine instance from `config`.
    ///
    /// On success the new instance replaces any prior one (which is disposed first) and the
    /// one-time setup runs: the fps hint is read and the image definitions are generated.
    /// On failure the session is left exactly as it was.
    pub async fn initialize(&mut self, config: &str) -> Result<InitReport, InitFailure> {
        tracing::info!("Initializing engine");
        let previous = std::mem::replace(&mut self.state, SessionState::Initializing);

        let constructed = match AssertUnwindSafe(self.factory.construct(config))
            .catch_unwind()
            .await
        {
            Ok(result) => result.and_then(one_time_setup),
            Err(payload) => Err(panicked(payload.as_ref()).into()),
        };

        match constructed {
            Ok((engine, fps, image_definitions)) => {
                if let SessionState::Ready(mut old) = previous {
                    old.dispose();
                    self.events.emit(SessionEvent::Disposed);
                }

                self.fps = Some(fps);
                self.state = SessionState::Ready(engine);

                tracing::info!(fps, "Engine initialized");
                self.events.emit(SessionEvent::Initialized { fps });
                Ok(InitReport {
                    fps,
                    image_definitions,
                })
            }
            Err(err) => {
                self.state = previous;
                match &err {
                    ConstructError::Rejected(message) => {
                        tracing::warn!(%message, "Engine rejected configuration");
                    }
                    ConstructError::Internal(cause) => {
                        tracing::error!(error = %cause, "Engine construction failed unexpectedly");
                    }
                }
                let message = err.to_string();
                self.events.emit(SessionEvent::InitializationFailed {
                    message: message.clone(),
                });
                Err(InitFailure(message))
            }
        }
    }

    /// Initializes if needed, then pushes `config` into the live instance.
    pub async fn reload(&mut self, config: &str) -> ReloadOutcome {
        let mut outcome = ReloadOutcome::default();

        if !self.is_ready() {
            match self.initialize(config).await {
                Ok(report) => {
                    outcome.initialized = true;
                    outcome.image_definitions = Some(report.image_definitions);
                }
                Err(InitFailure(message)) => {
                    outcome.message = message;
                    return outcome;
                }
            }
        }

        if let SessionState::Ready(engine) = &mut self.state {
            let applied = panic::catch_unwind(AssertUnwindSafe(|| {
                let message = engine.update_config(config);
                (message, engine.fps())
            }));
            let message = match applied {
                Ok((message, fps)) => {
                    self.fps = Some(fps);
                    message
                }
                Err(payload) => panicked(payload.as_ref()).to_string(),
            };

            if message.is_empty() {
                tracing::debug!("Configuration applied");
                self.events.emit(SessionEvent::ConfigApplied);
            } else {
                tracing::warn!(%message, "Configuration update rejected");
                self.events.emit(SessionEvent::UpdateRejected {
                    message: message.clone(),
                });
            }

            outcome.message = message;
            outcome.ready = true;
        }

        outcome
    }

    /// Forwards the world snapshot into the live instance. No-op when not ready.
    pub fn tick(&mut self, world: &WorldFrame) -> anyhow::Result<()> {
        match &mut self.state {
            SessionState::Ready(engine) => engine.update_frame(world),
            _ => Ok(()),
        }
    }

    /// Requests a fresh render. Returns `None` when not ready.
    pub fn draw(&mut self) -> anyhow::Result<Option<FrameOutput>> {
        let SessionState::Ready(engine) = &mut self.state else {
            return Ok(None);
        };

        let drawn = engine.draw()?;
        Ok(Some(FrameOutput {
            defs: drawn.defs,
            paths: drawn.paths,
            background: engine.background_color(),
            texture_ids: engine.texture_ids(),
        }))
    }

    pub fn texture_ids(&self) -> Vec<String> {
        match &self.state {
            SessionState::Ready(engine) => engine.texture_ids(),
            _ => Vec::new(),
        }
    }

    /// One guarded tick + draw.
    ///
    /// Errors and panics raised by the engine are contained to this frame.
    pub fn render_frame(&mut self, world: &WorldFrame) -> FrameReply {
        if !self.is_ready() {
            return FrameReply::NotReady;
        }

        let result = guarded(|| {
            self.tick(world)?;
            self.draw()
        });

        match result {
            Ok(Some(output)) => FrameReply::Rendered(output),
            Ok(None) => FrameReply::NotReady,
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(frame = world.frame, %error, "Frame failed");
                self.events.emit(SessionEvent::FrameFailed {
                    frame: world.frame,
                    error: error.clone(),
                });
                FrameReply::Failed(error)
            }
        }
    }

    /// Disposes the live instance, if any, and returns to `Uninitialized`.
    pub fn shutdown(&mut self) {
        if let SessionState::Ready(mut engine) =
            std::mem::replace(&mut self.state, SessionState::Uninitialized)
        {
            engine.dispose();
            tracing::info!("Engine disposed");
            self.events.emit(SessionEvent::Disposed);
        }
        self.fps = None;
    }
}

impl<F: EngineFactory> Drop for EngineSession<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn guarded<T>(f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
}

/// Reads the fps hint and image definitions of a fresh instance.
///
/// A panic here discards the instance.
fn one_time_setup<E: Engine>(mut engine: E) -> Result<(E, f64, String), ConstructError> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        (engine.fps(), engine.make_image_definitions())
    })) {
        Ok((fps, image_definitions)) => Ok((engine, fps, image_definitions)),
        Err(payload) => {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| engine.dispose()));
            Err(panicked(payload.as_ref()).into())
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> anyhow::Error {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    anyhow::anyhow!("engine panicked: {reason}")
}
