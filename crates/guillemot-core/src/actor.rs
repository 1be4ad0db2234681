//! # Session Actor
//!
//! The engine session lives on a dedicated thread with its own current-thread runtime. Every
//! other task talks to it through a [`SessionHandle`], so the session is only ever touched by one
//! task and commands are applied strictly in arrival order. A render request that arrives while
//! a reload is in flight waits for the reload to settle.

use std::thread;

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::LiveConfig;
use crate::engine::{EngineFactory, WorldFrame};
use crate::error::{SessionError, SpawnError};
use crate::events::{SessionEvent, SessionEventBus};
use crate::session::{EngineSession, FrameReply, ReloadOutcome, SessionSnapshot};

enum SessionCommand {
    Reload {
        config: String,
        reply: oneshot::Sender<ReloadOutcome>,
    },
    RenderFrame {
        world: WorldFrame,
        reply: oneshot::Sender<FrameReply>,
    },
    TextureIds(oneshot::Sender<Vec<String>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to the session actor.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
    events: SessionEventBus,
}

/// Starts the session actor on its own thread.
///
/// The actor stops once every handle is dropped or [`SessionHandle::shutdown`] is called.
/// `config` is validated first; zero channel capacities are refused.
pub fn spawn_session_thread<F: EngineFactory>(
    factory: F,
    config: &LiveConfig,
) -> Result<SessionHandle, SpawnError> {
    config.validate()?;
    let (tx, rx) = mpsc::channel(config.command_buffer);
    let events = SessionEventBus::new(config.event_capacity);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let bus = events.clone();
    thread::Builder::new()
        .name("guillemot-session".to_string())
        .spawn(move || {
            let session = EngineSession::new(factory, bus);
            rt.block_on(run_session(session, rx));
        })?;

    Ok(SessionHandle { tx, events })
}

async fn run_session<F: EngineFactory>(
    mut session: EngineSession<F>,
    mut rx: mpsc::Receiver<SessionCommand>,
) {
    tracing::info!("Session actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Reload { config, reply } => {
                let outcome = session.reload(&config).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::RenderFrame { world, reply } => {
                let _ = reply.send(session.render_frame(&world));
            }
            SessionCommand::TextureIds(reply) => {
                let _ = reply.send(session.texture_ids());
            }
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(session.snapshot());
            }
            SessionCommand::Shutdown(reply) => {
                session.shutdown();
                let _ = reply.send(());
                break;
            }
        }
    }

    session.shutdown();
    tracing::info!("Session actor stopped");
}

impl SessionHandle {
    /// Initializes or updates the engine from `config` and waits for the outcome.
    pub async fn reload(&self, config: impl Into<String>) -> Result<ReloadOutcome, SessionError> {
        let config = config.into();
        self.request(|reply| SessionCommand::Reload { config, reply })
            .await
    }

    /// Runs one tick + draw against the live instance.
    pub async fn render_frame(&self, world: WorldFrame) -> Result<FrameReply, SessionError> {
        self.request(|reply| SessionCommand::RenderFrame { world, reply })
            .await
    }

    pub async fn texture_ids(&self) -> Result<Vec<String>, SessionError> {
        self.request(SessionCommand::TextureIds).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(SessionCommand::Snapshot).await
    }

    /// Disposes the live instance and stops the actor.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Shutdown).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await?;
        Ok(rx.await?)
    }
}
