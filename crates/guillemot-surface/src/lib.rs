//! # Guillemot Surface
//!
//! `guillemot_surface` is the headless model of the host page the live engine renders into.
//! It tracks input, names the output slots, and moves raster textures into the vector output,
//! while the actual drawing is delegated to the host application.
//!
//! ## Core Architecture
//! - **Input (`src/input.rs`)**: Latest pointer and viewport state.
//! - **View (`src/view.rs`)**: Client space <-> surface space.
//! - **Render (`src/render.rs`)**: The `OutputSurface` trait and its markup slots.
//! - **Texture (`src/texture.rs`)**: Secondary raster surfaces -> image elements.

pub mod input;
pub mod render;
pub mod texture;
pub mod view;

// Re-exports for convenience
pub use input::{InputState, InputTracker, PointerState, SharedInput};
pub use render::{OutputSlot, OutputSurface, present};
pub use texture::{TextureHost, TextureNames, TextureRefresh, refresh_textures};
pub use view::BoundingBox;
