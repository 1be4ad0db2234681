//! # Engine Contract
//!
//! The scene engine is an external collaborator. It is built from configuration text, accepts
//! configuration updates, and draws one frame at a time from a snapshot of the world.
//! Nothing in this crate interprets the configuration or the markup the engine produces.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ConstructError;

/// World state pushed into the engine once per render tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldFrame {
    /// Current value of the frame counter.
    pub frame: u64,
    /// Width of the output surface in pixels.
    pub width: f32,
    /// Height of the output surface in pixels.
    pub height: f32,
    /// Pointer x, relative to the output surface's top-left corner.
    pub pointer_x: f32,
    /// Pointer y, relative to the output surface's top-left corner.
    pub pointer_y: f32,
    /// Whether the pointer button is held.
    pub pointer_down: bool,
}

/// The two markup fragments returned by a single draw call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutput {
    /// Pattern / style definitions.
    pub defs: String,
    /// Path content.
    pub paths: String,
}

/// Everything a completed render tick produces for the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub defs: String,
    pub paths: String,
    pub background: String,
    /// Secondary raster surfaces that exist this frame.
    pub texture_ids: Vec<String>,
}

/// A live engine instance.
///
/// Handles are owned by exactly one session and are never shared, so the trait does not
/// require `Send`.
pub trait Engine: 'static {
    /// Pushes new configuration text into the live instance.
    ///
    /// Returns a validation message; an empty string means the update was accepted.
    fn update_config(&mut self, config: &str) -> String;

    /// The frame-rate hint declared by the configuration.
    fn fps(&self) -> f64;

    /// Static image-definition markup, requested once per successful construction.
    fn make_image_definitions(&self) -> String;

    /// Identifiers of the secondary raster surfaces the engine currently declares.
    fn texture_ids(&self) -> Vec<String>;

    /// Forwards the world snapshot for the upcoming draw.
    fn update_frame(&mut self, world: &WorldFrame) -> anyhow::Result<()>;

    /// Renders a fresh frame.
    fn draw(&mut self) -> anyhow::Result<DrawOutput>;

    /// Current background color, as a CSS color string.
    fn background_color(&self) -> String;

    /// Releases any resources held by the instance.
    ///
    /// Called exactly once before the handle is dropped or replaced.
    fn dispose(&mut self) {}
}

/// Builds engine instances from configuration text.
#[async_trait(?Send)]
pub trait EngineFactory: Send + 'static {
    type Engine: Engine;

    /// Constructs one engine instance.
    ///
    /// A configuration the engine refuses is reported as `ConstructError::Rejected`.
    async fn construct(&self, config: &str) -> Result<Self::Engine, ConstructError>;
}
