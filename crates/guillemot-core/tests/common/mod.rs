#![allow(dead_code)]

use async_trait::async_trait;
use guillemot_core::{ConstructError, DrawOutput, Engine, EngineFactory, WorldFrame};
use std::sync::{Arc, Mutex};

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Counters shared between a test and the fake engine it drives.
#[derive(Default, Debug)]
pub struct ProbeState {
    pub constructs: usize,
    pub image_definitions: usize,
    pub disposes: usize,
    pub updates: Vec<String>,
    pub frames: Vec<WorldFrame>,
}

#[derive(Clone, Default)]
pub struct Probe(pub Arc<Mutex<ProbeState>>);

impl Probe {
    pub fn get<T>(&self, f: impl FnOnce(&ProbeState) -> T) -> T {
        f(&self.0.lock().unwrap())
    }
}

/// Fake engine configured by keywords in the document:
/// - `invalid:<msg>` is refused at construction with `<msg>`
/// - `crash` makes construction itself fail
/// - `panic-construct` makes construction panic
/// - `bad-update` is refused by `update_config`
/// - `panic-update` makes `update_config` panic
/// - `fail-frame` makes `update_frame` fail on frame 2
/// - `panic-draw` makes `draw` panic
/// - `tex` declares a `noise` texture
pub struct FakeEngine {
    probe: Probe,
    config: String,
    last: Option<WorldFrame>,
}

impl Engine for FakeEngine {
    fn update_config(&mut self, config: &str) -> String {
        self.probe.0.lock().unwrap().updates.push(config.to_string());
        if config.contains("panic-update") {
            panic!("update exploded");
        }
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
        self.probe.0.lock().unwrap().image_definitions += 1;
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
        self.probe.0.lock().unwrap().frames.push(*world);
        if self.config.contains("fail-frame") && world.frame == 2 {
            anyhow::bail!("bad frame");
        }
        self.last = Some(*world);
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<DrawOutput> {
        if self.config.contains("panic-draw") {
            panic!("draw exploded");
        }
        let frame = self.last.map(|w| w.frame).unwrap_or(0);
        Ok(DrawOutput {
            defs: format!("<pattern data-config=\"{}\"/>", self.config.len()),
            paths: format!("<path data-frame=\"{frame}\"/>"),
        })
    }

    fn background_color(&self) -> String {
        "#101010".to_string()
    }

    fn dispose(&mut self) {
        self.probe.0.lock().unwrap().disposes += 1;
    }
}

pub struct FakeFactory {
    pub probe: Probe,
}

impl FakeFactory {
    pub fn new() -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

#[async_trait(?Send)]
impl EngineFactory for FakeFactory {
    type Engine = FakeEngine;

    async fn construct(&self, config: &str) -> Result<FakeEngine, ConstructError> {
        tokio::task::yield_now().await;
        if let Some(message) = config.strip_prefix("invalid:") {
            return Err(ConstructError::rejected(message.trim()));
        }
        if config.contains("panic-construct") {
            panic!("construct threw");
        }
        if config.contains("crash") {
            return Err(anyhow::anyhow!("wasm trap").into());
        }
        self.probe.0.lock().unwrap().constructs += 1;
        Ok(FakeEngine {
            probe: self.probe.clone(),
            config: String::new(),
            last: None,
        })
    }
}

pub fn world(frame: u64, x: f32, y: f32) -> WorldFrame {
    WorldFrame {
        frame,
        width: 800.0,
        height: 600.0,
        pointer_x: x,
        pointer_y: y,
        pointer_down: false,
    }
}
