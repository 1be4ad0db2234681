//! # Texture Bridge
//!
//! Some effects are rasterized on secondary canvases and then embedded back into the vector
//! output as images. After each draw, every texture the engine declares is captured from its
//! `<id>Canvas` source and written into its `<id>Img` destination as a PNG data URL.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

/// Source / destination element names for one texture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureNames {
    /// The raster surface the engine draws into.
    pub canvas: String,
    /// The image element inside the vector output.
    pub image: String,
}

impl TextureNames {
    pub fn for_id(id: &str) -> Self {
        Self {
            canvas: format!("{id}Canvas"),
            image: format!("{id}Img"),
        }
    }
}

/// Host access to raster sources and image destinations.
pub trait TextureHost: Send + Sync {
    /// Whether the destination image element exists yet.
    fn has_image(&self, image_id: &str) -> bool;

    /// Current pixels of a raster surface, PNG encoded. `None` if there is no such surface.
    fn capture_png(&self, canvas_id: &str) -> Option<Vec<u8>>;

    /// Points an image element at a new source.
    fn set_image_source(&self, image_id: &str, href: &str);
}

/// Counts from one bridge pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureRefresh {
    pub updated: usize,
    pub skipped: usize,
}

/// Copies every declared texture into its destination image.
///
/// A texture without a destination element (or without a capturable source) is skipped; that is
/// the normal state until the engine's markup creates the element.
pub fn refresh_textures(host: &dyn TextureHost, texture_ids: &[String]) -> TextureRefresh {
    let mut refresh = TextureRefresh::default();

    for id in texture_ids {
        let names = TextureNames::for_id(id);
        if !host.has_image(&names.image) {
            tracing::debug!(texture = %id, image = %names.image, "No destination image yet");
            refresh.skipped += 1;
            continue;
        }

        match host.capture_png(&names.canvas) {
            Some(png) if !png.is_empty() => {
                host.set_image_source(&names.image, &png_data_url(&png));
                refresh.updated += 1;
            }
            _ => {
                tracing::debug!(texture = %id, canvas = %names.canvas, "Nothing to capture");
                refresh.skipped += 1;
            }
        }
    }

    refresh
}

/// Encodes PNG bytes as a `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    )
}
