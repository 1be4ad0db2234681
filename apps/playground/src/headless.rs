//! In-memory stand-ins for the browser page and the code editor.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use glam::Vec2;
use guillemot_bridge::{ConfigEditor, KeyAction};
use guillemot_surface::render::{CONTAINER_ID, ERROR_SLOT_ID, SUBMIT_ID};
use guillemot_surface::{BoundingBox, OutputSlot, OutputSurface, TextureHost};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct PageState {
    bounds: BoundingBox,
    slots: HashMap<OutputSlot, String>,
    background: String,
    error: String,
    images: HashMap<String, String>,
}

/// A page whose output is kept as markup strings.
pub struct HeadlessPage {
    state: Mutex<PageState>,
}

impl HeadlessPage {
    pub fn new(size: Vec2) -> Self {
        Self {
            state: Mutex::new(PageState {
                bounds: BoundingBox::new(Vec2::ZERO, size),
                ..PageState::default()
            }),
        }
    }

    pub fn resize(&self, size: Vec2) {
        lock(&self.state).bounds.size = size;
    }

    /// The page as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let state = lock(&self.state);
        let slot = |slot: OutputSlot| state.slots.get(&slot).map(String::as_str).unwrap_or("");
        let size = state.bounds.size;

        format!(
            "<!doctype html>\n<html><body>\n\
             <pre id=\"{ERROR_SLOT_ID}\">{error}</pre>\n\
             <button id=\"{SUBMIT_ID}\">submit</button>\n\
             <svg id=\"{CONTAINER_ID}\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" style=\"background-color: {bg}\">\n\
             <defs id=\"{img_id}\">{img}</defs>\n\
             <defs id=\"{pattern_id}\">{pattern}</defs>\n\
             <g id=\"{paths_id}\">{paths}</g>\n\
             </svg>\n</body></html>\n",
            error = state.error,
            w = size.x,
            h = size.y,
            bg = state.background,
            img_id = OutputSlot::ImageDefs.element_id(),
            img = slot(OutputSlot::ImageDefs),
            pattern_id = OutputSlot::PatternDefs.element_id(),
            pattern = slot(OutputSlot::PatternDefs),
            paths_id = OutputSlot::Paths.element_id(),
            paths = slot(OutputSlot::Paths),
        )
    }
}

impl OutputSurface for HeadlessPage {
    fn bounding_box(&self) -> BoundingBox {
        lock(&self.state).bounds
    }

    fn write_slot(&self, slot: OutputSlot, markup: &str) {
        let mut state = lock(&self.state);
        if slot == OutputSlot::ImageDefs {
            // Image elements declared by the engine become texture destinations.
            for id in image_ids(markup) {
                state.images.entry(id).or_default();
            }
        }
        state.slots.insert(slot, markup.to_string());
    }

    fn set_background(&self, color: &str) {
        lock(&self.state).background = color.to_string();
    }

    fn set_error(&self, message: &str) {
        if !message.is_empty() {
            tracing::warn!(%message, "Engine reported an error");
        }
        lock(&self.state).error = message.to_string();
    }
}

impl TextureHost for HeadlessPage {
    fn has_image(&self, image_id: &str) -> bool {
        lock(&self.state).images.contains_key(image_id)
    }

    /// There are no raster surfaces in a headless page.
    fn capture_png(&self, _canvas_id: &str) -> Option<Vec<u8>> {
        None
    }

    fn set_image_source(&self, image_id: &str, href: &str) {
        lock(&self.state)
            .images
            .insert(image_id.to_string(), href.to_string());
    }
}

fn image_ids(markup: &str) -> Vec<String> {
    markup
        .split("<image")
        .skip(1)
        .filter_map(|element| {
            let rest = element.split_once("id=\"")?.1;
            rest.split_once('"').map(|(id, _)| id.to_string())
        })
        .collect()
}

/// An editor backed by a file on disk, re-read on every access.
pub struct FileEditor {
    path: Option<PathBuf>,
    fallback: String,
    bindings: Mutex<Vec<(String, KeyAction)>>,
}

impl FileEditor {
    pub fn new(path: Option<PathBuf>, fallback: &str) -> Self {
        Self {
            path,
            fallback: fallback.to_string(),
            bindings: Mutex::new(Vec::new()),
        }
    }

    /// Fires every action bound to `chord`. Returns how many ran.
    pub fn press(&self, chord: &str) -> usize {
        let mut fired = 0;
        for (bound, action) in lock(&self.bindings).iter() {
            if bound == chord {
                action();
                fired += 1;
            }
        }
        fired
    }
}

impl ConfigEditor for FileEditor {
    fn document(&self) -> String {
        let Some(path) = &self.path else {
            return self.fallback.clone();
        };
        match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Could not read document; using built-in sketch");
                self.fallback.clone()
            }
        }
    }

    fn bind_key(&self, chord: &str, action: KeyAction) {
        lock(&self.bindings).push((chord.to_string(), action));
    }
}
