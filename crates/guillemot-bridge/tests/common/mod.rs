#![allow(dead_code)]

use async_trait::async_trait;
use glam::Vec2;
use guillemot_bridge::{ConfigEditor, FrameClock, KeyAction};
use guillemot_core::{ConstructError, DrawOutput, Engine, EngineFactory, WorldFrame};
use guillemot_surface::{BoundingBox, OutputSlot, OutputSurface, TextureHost};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// --- Engine ---------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Seen(pub Arc<Mutex<Vec<WorldFrame>>>);

impl Seen {
    pub fn frames(&self) -> Vec<WorldFrame> {
        self.0.lock().unwrap().clone()
    }
}

/// Keywords: `invalid:<msg>` refuses construction, `bad-update` refuses updates,
/// `fail-frame` fails frame 2, `tex` declares a `noise` texture.
pub struct SketchEngine {
    seen: Seen,
    config: String,
}

impl Engine for SketchEngine {
    fn update_config(&mut self, config: &str) -> String {
        if config.contains("bad-update") {
            return "update refused".to_string();
        }
        self.config = config.to_string();
        String::new()
    }

    fn fps(&self) -> f64 {
        30.0
    }

    fn make_image_definitions(&self) -> String {
        "<image id=\"noiseImg\"/>".to_string()
    }

    fn texture_ids(&self) -> Vec<String> {
        if self.config.contains("tex") {
            vec!["noise".to_string()]
        } else {
            Vec::new()
        }
    }

    fn update_frame(&mut self, world: &WorldFrame) -> anyhow::Result<()> {
        self.seen.0.lock().unwrap().push(*world);
        if self.config.contains("fail-frame") && world.frame == 2 {
            anyhow::bail!("bad frame");
        }
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<DrawOutput> {
        let frame = self.seen.0.lock().unwrap().last().map(|w| w.frame).unwrap_or(0);
        Ok(DrawOutput {
            defs: "<pattern id=\"p\"/>".to_string(),
            paths: format!("<path data-frame=\"{frame}\"/>"),
        })
    }

    fn background_color(&self) -> String {
        "#222222".to_string()
    }
}

pub struct SketchFactory {
    pub seen: Seen,
}

pub fn factory() -> (SketchFactory, Seen) {
    let seen = Seen::default();
    (SketchFactory { seen: seen.clone() }, seen)
}

#[async_trait(?Send)]
impl EngineFactory for SketchFactory {
    type Engine = SketchEngine;

    async fn construct(&self, config: &str) -> Result<SketchEngine, ConstructError> {
        if let Some(message) = config.strip_prefix("invalid:") {
            return Err(ConstructError::rejected(message.trim()));
        }
        Ok(SketchEngine {
            seen: self.seen.clone(),
            config: String::new(),
        })
    }
}

// --- Page -----------------------------------------------------------------

#[derive(Default)]
pub struct FakePage {
    pub bounds: Mutex<BoundingBox>,
    pub slots: Mutex<HashMap<OutputSlot, String>>,
    pub slot_writes: Mutex<HashMap<OutputSlot, usize>>,
    pub background: Mutex<String>,
    pub error: Mutex<Option<String>>,
    pub images: Mutex<HashMap<String, String>>,
}

impl FakePage {
    pub fn new(origin: Vec2, size: Vec2) -> Arc<Self> {
        let page = Self::default();
        *page.bounds.lock().unwrap() = BoundingBox::new(origin, size);
        page.images
            .lock()
            .unwrap()
            .insert("noiseImg".to_string(), String::new());
        Arc::new(page)
    }

    pub fn slot(&self, slot: OutputSlot) -> Option<String> {
        self.slots.lock().unwrap().get(&slot).cloned()
    }

    pub fn writes(&self, slot: OutputSlot) -> usize {
        self.slot_writes.lock().unwrap().get(&slot).copied().unwrap_or(0)
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }

    pub fn image(&self, id: &str) -> Option<String> {
        self.images.lock().unwrap().get(id).cloned()
    }

    pub fn resize(&self, size: Vec2) {
        self.bounds.lock().unwrap().size = size;
    }
}

impl OutputSurface for FakePage {
    fn bounding_box(&self) -> BoundingBox {
        *self.bounds.lock().unwrap()
    }

    fn write_slot(&self, slot: OutputSlot, markup: &str) {
        self.slots.lock().unwrap().insert(slot, markup.to_string());
        *self.slot_writes.lock().unwrap().entry(slot).or_default() += 1;
    }

    fn set_background(&self, color: &str) {
        *self.background.lock().unwrap() = color.to_string();
    }

    fn set_error(&self, message: &str) {
        *self.error.lock().unwrap() = Some(message.to_string());
    }
}

impl TextureHost for FakePage {
    fn has_image(&self, image_id: &str) -> bool {
        self.images.lock().unwrap().contains_key(image_id)
    }

    fn capture_png(&self, canvas_id: &str) -> Option<Vec<u8>> {
        (canvas_id == "noiseCanvas").then(|| b"png".to_vec())
    }

    fn set_image_source(&self, image_id: &str, href: &str) {
        self.images
            .lock()
            .unwrap()
            .insert(image_id.to_string(), href.to_string());
    }
}

// --- Editor ---------------------------------------------------------------

#[derive(Default)]
pub struct FakeEditor {
    document: Mutex<String>,
    bindings: Mutex<Vec<(String, KeyAction)>>,
}

impl FakeEditor {
    pub fn new(document: &str) -> Arc<Self> {
        let editor = Self::default();
        *editor.document.lock().unwrap() = document.to_string();
        Arc::new(editor)
    }

    pub fn set_document(&self, document: &str) {
        *self.document.lock().unwrap() = document.to_string();
    }

    /// Simulates pressing a bound chord. Returns false if nothing is bound to it.
    pub fn press(&self, chord: &str) -> bool {
        let bindings = self.bindings.lock().unwrap();
        let mut fired = false;
        for (bound, action) in bindings.iter() {
            if bound == chord {
                action();
                fired = true;
            }
        }
        fired
    }
}

impl ConfigEditor for FakeEditor {
    fn document(&self) -> String {
        self.document.lock().unwrap().clone()
    }

    fn bind_key(&self, chord: &str, action: KeyAction) {
        self.bindings
            .lock()
            .unwrap()
            .push((chord.to_string(), action));
    }
}

// --- Clock ----------------------------------------------------------------

/// A clock that never waits.
pub struct ImmediateClock;

#[async_trait]
impl FrameClock for ImmediateClock {
    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;
    }
}
