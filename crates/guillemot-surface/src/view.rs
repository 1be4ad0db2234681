//! # Surface Geometry
//!
//! Converts between client coordinates (the host window) and surface-local coordinates
//! (relative to the output surface's top-left corner).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The output surface's current bounding box, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl BoundingBox {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Converts a point from **client space** to **surface space**.
    ///
    /// Formula: `Local = Client - Origin`. The result is not clamped to the box.
    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client - self.origin
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(600.0, 600.0),
        }
    }
}
