//! # Output Surface
//!
//! The host's vector output (an SVG container in a browser) seen as a set of named slots.
//! Markup written into a slot is opaque: it is placed, never parsed.

use serde::{Deserialize, Serialize};

use crate::view::BoundingBox;

/// Element id of the container hosting the rendered output.
pub const CONTAINER_ID: &str = "frame";
/// Element id of the error message slot.
pub const ERROR_SLOT_ID: &str = "err_msg";
/// Element id of the manual submit control.
pub const SUBMIT_ID: &str = "submit";

/// Named markup slots inside the output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputSlot {
    /// Static image definitions, written once per engine construction.
    ImageDefs,
    /// Pattern / style definitions, rewritten every frame.
    PatternDefs,
    /// Path content, rewritten every frame.
    Paths,
}

impl OutputSlot {
    pub fn element_id(self) -> &'static str {
        match self {
            OutputSlot::ImageDefs => "imgDefs",
            OutputSlot::PatternDefs => "patternDefs",
            OutputSlot::Paths => "paths",
        }
    }
}

/// The host-side output surface.
///
/// Methods take `&self`: hosts own their interior mutability (a DOM, a buffer behind a lock).
pub trait OutputSurface: Send + Sync {
    /// Current bounding box of the container, in client pixels.
    fn bounding_box(&self) -> BoundingBox;

    /// Replaces the contents of a markup slot.
    fn write_slot(&self, slot: OutputSlot, markup: &str);

    /// Sets the container's background color.
    fn set_background(&self, color: &str);

    /// Replaces the user-visible error message. An empty message clears it.
    fn set_error(&self, message: &str);
}

/// Writes one drawn frame into its slots.
pub fn present(surface: &dyn OutputSurface, defs: &str, paths: &str, background: &str) {
    surface.write_slot(OutputSlot::PatternDefs, defs);
    surface.write_slot(OutputSlot::Paths, paths);
    surface.set_background(background);
}
