//! # Guillemot Core Library
//!
//! This library owns the live engine session for the Guillemot live-coding host (Headless).
//!
//! - **Engine (`src/engine.rs`)**: the contract the external scene engine must fulfil.
//! - **Session (`src/session.rs`)**: the `Uninitialized -> Initializing -> Ready` lifecycle.
//! - **Actor (`src/actor.rs`)**: a dedicated thread that owns the session and serializes access to it.
//! - **Frame (`src/frame.rs`)**: the monotonic frame counter.

pub mod actor;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod frame;
pub mod session;

pub use actor::{SessionHandle, spawn_session_thread};
pub use config::LiveConfig;
pub use engine::{DrawOutput, Engine, EngineFactory, FrameOutput, WorldFrame};
pub use error::{ConfigError, ConstructError, SessionError, SpawnError};
pub use events::{SessionEvent, SessionEventBus};
pub use frame::FrameCounter;
pub use session::{
    EngineSession, FrameReply, InitFailure, InitReport, ReloadOutcome, SessionSnapshot, SessionStatus,
};
