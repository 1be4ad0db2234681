use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Observable lifecycle events of the engine session.
///
/// These are broadcast via the `SessionEventBus` and can be consumed by hosts or monitoring
/// tools. Sending never blocks and never fails the session when nobody is listening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// A new engine instance was constructed.
    Initialized {
        /// Frame-rate hint declared by the configuration.
        fps: f64,
    },
    /// The engine refused to construct from the configuration.
    InitializationFailed { message: String },
    /// A configuration update was accepted by the live instance.
    ConfigApplied,
    /// A configuration update was refused; the prior configuration stays active.
    UpdateRejected { message: String },
    /// A single tick or draw failed.
    FrameFailed { frame: u64, error: String },
    /// The live instance was released.
    Disposed,
}

/// Broadcast channel for [`SessionEvent`]s.
#[derive(Clone, Debug)]
pub struct SessionEventBus(pub broadcast::Sender<SessionEvent>);

impl SessionEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self(tx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.0.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        // No receivers is not an error.
        let _ = self.0.send(event);
    }
}
