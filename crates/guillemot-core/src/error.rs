use thiserror::Error;

/// Failure to construct an engine instance.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// The engine validated the configuration and refused it.
    #[error("{0}")]
    Rejected(String),
    /// The construction call itself failed.
    #[error("engine construction failed: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ConstructError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Errors raised when talking to the session actor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("engine session has shut down")]
    Closed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for SessionError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for SessionError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::Closed
    }
}

/// Failure to start the session actor.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start session thread: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading [`crate::LiveConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid live config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("refresh rate must be positive, got {0}")]
    RefreshRate(f64),
    #[error("{0} must be at least 1")]
    Capacity(&'static str),
}
