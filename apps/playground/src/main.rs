mod headless;
mod sketch;

use std::env;
use std::f32::consts::TAU;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use guillemot_bridge::LiveBridge;
use guillemot_core::{LiveConfig, SessionEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, interval};

use headless::{FileEditor, HeadlessPage};
use sketch::{DEFAULT_DOCUMENT, SketchFactory};

/// Usage: `guillemot-playground [document.yaml] [output.html]`
///
/// Runs the sketch headlessly for `GUILLEMOT_RUN_SECONDS` (default 3), sweeping a simulated
/// pointer across the page and reloading the document halfway through, then writes the last
/// frame to the output file.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt::init();

    let config = match env::var("GUILLEMOT_CONFIG") {
        Ok(path) => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read host config {path}"))?;
            LiveConfig::from_yaml(&source)?
        }
        Err(_) => LiveConfig::from_env(),
    };
    let run_for = env::var("GUILLEMOT_RUN_SECONDS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map(Duration::from_secs_f64)
        .unwrap_or(Duration::from_secs(3));

    let mut args = env::args().skip(1);
    let document = args.next().map(PathBuf::from);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("guillemot.html"));

    let editor = Arc::new(FileEditor::new(document, DEFAULT_DOCUMENT));
    let page = Arc::new(HeadlessPage::new(Vec2::from(config.initial_viewport)));
    let bridge = LiveBridge::start(SketchFactory, editor.clone(), page.clone(), &config)?;

    tokio::spawn(log_session_events(bridge.session().subscribe()));

    let started = Instant::now();
    let mut ticker = interval(Duration::from_millis(50));
    let mut reloaded = false;
    let mut pressed = false;
    let size = Vec2::from(config.initial_viewport);

    while started.elapsed() < run_for {
        ticker.tick().await;
        let progress = started.elapsed().as_secs_f32() / run_for.as_secs_f32();

        let orbit = Vec2::new((progress * TAU).cos(), (progress * TAU).sin());
        bridge.pointer_moved(size * 0.5 + orbit * size.min_element() * 0.35);

        let should_press = (progress * 4.0) as u32 % 2 == 1;
        if should_press != pressed {
            if should_press {
                bridge.pointer_down();
            } else {
                bridge.pointer_up();
            }
            pressed = should_press;
        }

        if !reloaded && progress >= 0.5 {
            tracing::info!(chord = %config.reload_chord, "Simulating reload key press");
            if editor.press(&config.reload_chord) == 0 {
                bridge.submit();
            }
            reloaded = true;
        }
    }

    let frames = bridge.shutdown().await?;
    fs::write(&output, page.to_html())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(frames = frames.completed(), output = %output.display(), "Playground finished");
    Ok(())
}

/// Logs session events until the session closes. Returns how many were logged.
///
/// A lagging receiver skips the dropped events and keeps going.
async fn log_session_events(mut events: broadcast::Receiver<SessionEvent>) -> usize {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(SessionEvent::FrameFailed { frame, error }) => {
                tracing::warn!(frame, %error, "Frame failed");
            }
            Ok(event) => tracing::info!(?event, "Session event"),
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Session event log fell behind");
                continue;
            }
            Err(RecvError::Closed) => return logged,
        }
        logged += 1;
    }
}
