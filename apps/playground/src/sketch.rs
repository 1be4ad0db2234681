//! A small grid sketch driven by a YAML document.
//!
//! Only the parts of the document this sketch understands are read; everything else in it is
//! ignored, so richer documents load unchanged.

use std::f32::consts::TAU;
use std::fmt::Write as _;

use async_trait::async_trait;
use glam::Vec2;
use guillemot_core::{ConstructError, DrawOutput, Engine, EngineFactory, WorldFrame};
use serde::Deserialize;

pub const DEFAULT_DOCUMENT: &str = "\
# Edit and press Mod-Enter to reload.

drawing:
  sequencer:
    type: Square  # Hex, Rect (update size to [x, y])
    size: 100
    rows: 5
    cols: 11

app:
  fps: 30.0
  background: \"#fdfcf7\"
";

const DEFAULT_FPS: f64 = 30.0;
const DEFAULT_BACKGROUND: &str = "#fdfcf7";
const POINTER_REACH: f32 = 120.0;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SketchDocument {
    drawing: DrawingSection,
    app: AppSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DrawingSection {
    sequencer: SequencerSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SequencerSection {
    #[serde(rename = "type")]
    kind: String,
    size: CellSize,
    rows: u32,
    cols: u32,
}

impl Default for SequencerSection {
    fn default() -> Self {
        Self {
            kind: "Square".to_string(),
            size: CellSize::Uniform(100.0),
            rows: 5,
            cols: 11,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum CellSize {
    Uniform(f32),
    PerAxis([f32; 2]),
}

impl CellSize {
    fn as_vec2(self) -> Vec2 {
        match self {
            CellSize::Uniform(size) => Vec2::splat(size),
            CellSize::PerAxis([x, y]) => Vec2::new(x, y),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AppSection {
    fps: f64,
    background: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Square,
    Hex,
    Rect,
}

/// The parsed, validated part of a document.
#[derive(Debug, Clone)]
struct Sketch {
    layout: Layout,
    cell: Vec2,
    rows: u32,
    cols: u32,
    fps: f64,
    background: String,
}

fn parse_sketch(document: &str) -> Result<Sketch, String> {
    let parsed: SketchDocument = serde_yaml::from_str(document).map_err(|err| err.to_string())?;
    let sequencer = parsed.drawing.sequencer;

    let layout = match sequencer.kind.as_str() {
        "Square" => Layout::Square,
        "Hex" => Layout::Hex,
        "Rect" => Layout::Rect,
        _ => return Err("invalid sequencer type".to_string()),
    };

    let cell = match (layout, sequencer.size) {
        (Layout::Rect, size) => size.as_vec2(),
        (_, CellSize::Uniform(size)) => Vec2::splat(size),
        (_, CellSize::PerAxis(_)) => {
            return Err(format!("{:?} cells take a single size", layout));
        }
    };
    if cell.min_element() <= 0.0 {
        return Err("cell size must be positive".to_string());
    }

    Ok(Sketch {
        layout,
        cell,
        rows: sequencer.rows,
        cols: sequencer.cols,
        fps: parsed.app.fps,
        background: parsed.app.background,
    })
}

pub struct SketchEngine {
    sketch: Sketch,
    world: WorldFrame,
}

impl SketchEngine {
    fn cell_center(&self, row: u32, col: u32) -> Vec2 {
        let cell = self.sketch.cell;
        let (row, col) = (row as f32, col as f32);
        match self.sketch.layout {
            Layout::Square | Layout::Rect => Vec2::new(col * cell.x, row * cell.y),
            Layout::Hex => {
                let shift = if row as u32 % 2 == 1 { 0.5 } else { 0.0 };
                Vec2::new((col + shift) * cell.x, row * cell.y * 0.866)
            }
        }
    }

    fn grid_extent(&self) -> Vec2 {
        let last_row = self.sketch.rows.saturating_sub(1);
        let last_col = self.sketch.cols.saturating_sub(1);
        self.cell_center(last_row, last_col)
    }
}

impl Engine for SketchEngine {
    fn update_config(&mut self, config: &str) -> String {
        match parse_sketch(config) {
            Ok(sketch) => {
                self.sketch = sketch;
                String::new()
            }
            Err(message) => message,
        }
    }

    fn fps(&self) -> f64 {
        self.sketch.fps
    }

    fn make_image_definitions(&self) -> String {
        String::new()
    }

    fn texture_ids(&self) -> Vec<String> {
        Vec::new()
    }

    fn update_frame(&mut self, world: &WorldFrame) -> anyhow::Result<()> {
        self.world = *world;
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<DrawOutput> {
        let world = self.world;
        let t = world.frame as f32 / self.sketch.fps.max(1.0) as f32;
        let viewport = Vec2::new(world.width, world.height);
        let pointer = Vec2::new(world.pointer_x, world.pointer_y);
        let offset = (viewport - self.grid_extent()) * 0.5;
        let base_radius = self.sketch.cell.min_element() * 0.4;

        let mut paths = String::new();
        for row in 0..self.sketch.rows {
            for col in 0..self.sketch.cols {
                let center = offset + self.cell_center(row, col);
                let phase = t + col as f32 * 0.35 + row as f32 * 0.2;
                let mut radius = base_radius * (0.75 + 0.25 * (phase * TAU * 0.25).sin());

                let near = 1.0 - (center.distance(pointer) / POINTER_REACH).min(1.0);
                if world.pointer_down {
                    radius *= 1.0 + near;
                }
                let lightness = 40.0 + 35.0 * near;

                write!(
                    paths,
                    "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"hsl({:.0}, 55%, {:.0}%)\"/>",
                    center.x,
                    center.y,
                    radius.max(0.0),
                    (phase * 40.0) % 360.0,
                    lightness,
                )?;
            }
        }

        Ok(DrawOutput {
            defs: String::new(),
            paths,
        })
    }

    fn background_color(&self) -> String {
        self.sketch.background.clone()
    }

    fn dispose(&mut self) {
        tracing::debug!(rows = self.sketch.rows, cols = self.sketch.cols, "Sketch disposed");
    }
}

pub struct SketchFactory;

#[async_trait(?Send)]
impl EngineFactory for SketchFactory {
    type Engine = SketchEngine;

    async fn construct(&self, config: &str) -> Result<SketchEngine, ConstructError> {
        let sketch = parse_sketch(config).map_err(ConstructError::rejected)?;
        Ok(SketchEngine {
            sketch,
            world: WorldFrame::default(),
        })
    }
}
