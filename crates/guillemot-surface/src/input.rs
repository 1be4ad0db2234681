//! # Input Tracking
//!
//! Holds the latest pointer and viewport observations. Host event handlers write into it as
//! events arrive; the render loop reads a snapshot once per tick. Nothing here calls out.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::view::BoundingBox;

/// Pointer state relative to the output surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Position in surface space (pixels). May lie outside the surface.
    pub position: Vec2,
    /// Pointer button is held.
    pub down: bool,
}

/// Snapshot of everything the engine sees of the world, minus time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub pointer: PointerState,
    /// Width and height of the output surface.
    pub viewport: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer: PointerState::default(),
            viewport: Vec2::new(600.0, 600.0), // Replaced on the first viewport refresh
        }
    }
}

/// Latest observed input state.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    state: InputState,
}

impl InputTracker {
    pub fn new(initial_viewport: Vec2) -> Self {
        Self {
            state: InputState {
                viewport: initial_viewport,
                ..Default::default()
            },
        }
    }

    /// Records a pointer move given in client coordinates.
    pub fn pointer_moved(&mut self, client: Vec2, bounds: &BoundingBox) {
        self.state.pointer.position = bounds.to_local(client);
    }

    pub fn pointer_down(&mut self) {
        self.state.pointer.down = true;
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer.down = false;
    }

    /// Overwrites the viewport with the surface's current size.
    pub fn refresh_viewport(&mut self, bounds: &BoundingBox) {
        self.state.viewport = bounds.size;
    }

    pub fn snapshot(&self) -> InputState {
        self.state
    }
}

/// An [`InputTracker`] shared between event handlers and the render loop.
///
/// Each call is one short critical section; nothing awaits while holding the lock.
#[derive(Clone, Debug, Default)]
pub struct SharedInput(Arc<Mutex<InputTracker>>);

impl SharedInput {
    pub fn new(tracker: InputTracker) -> Self {
        Self(Arc::new(Mutex::new(tracker)))
    }

    pub fn pointer_moved(&self, client: Vec2, bounds: &BoundingBox) {
        self.lock().pointer_moved(client, bounds);
    }

    pub fn pointer_down(&self) {
        self.lock().pointer_down();
    }

    pub fn pointer_up(&self) {
        self.lock().pointer_up();
    }

    pub fn refresh_viewport(&self, bounds: &BoundingBox) {
        self.lock().refresh_viewport(bounds);
    }

    pub fn snapshot(&self) -> InputState {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, InputTracker> {
        // The tracker holds plain values, so a poisoned lock is still consistent.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
