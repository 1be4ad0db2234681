//! # Render Loop
//!
//! One iteration per display refresh, forever:
//! 1. push the current input state and frame number into the session,
//! 2. write the drawn fragments and background into the output slots,
//! 3. advance the frame counter,
//! 4. copy declared textures into the vector output.
//!
//! Until the session is ready an iteration does nothing but reschedule. The engine's fps hint is
//! deliberately ignored: the loop always runs at the clock's rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use guillemot_core::{FrameCounter, FrameReply, SessionError, SessionHandle, WorldFrame};
use guillemot_surface::{InputState, OutputSurface, SharedInput, TextureHost, present, refresh_textures};

use crate::clock::FrameClock;

/// What a single iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was drawn with this frame number.
    Rendered { frame: u64 },
    /// No live engine yet.
    Idle,
    /// The engine failed this frame; the counter did not advance.
    Skipped { frame: u64 },
}

/// Stop flag checked at the top of every iteration.
#[derive(Clone, Debug, Default)]
pub struct LoopStopper(Arc<AtomicBool>);

impl LoopStopper {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct RenderLoop<S, C> {
    session: SessionHandle,
    input: SharedInput,
    surface: Arc<S>,
    clock: C,
    frame: FrameCounter,
    stopper: LoopStopper,
}

impl<S, C> RenderLoop<S, C>
where
    S: OutputSurface + TextureHost + 'static,
    C: FrameClock,
{
    pub fn new(session: SessionHandle, input: SharedInput, surface: Arc<S>, clock: C) -> Self {
        Self {
            session,
            input,
            surface,
            clock,
            frame: FrameCounter::new(),
            stopper: LoopStopper::default(),
        }
    }

    /// Uses an externally created stop flag.
    pub fn with_stopper(mut self, stopper: LoopStopper) -> Self {
        self.stopper = stopper;
        self
    }

    pub fn stopper(&self) -> LoopStopper {
        self.stopper.clone()
    }

    pub fn frame(&self) -> FrameCounter {
        self.frame
    }

    /// Runs one iteration without waiting for the clock.
    pub async fn step(&mut self) -> Result<StepOutcome, SessionError> {
        let world = world_frame(self.frame.current(), &self.input.snapshot());

        match self.session.render_frame(world).await? {
            FrameReply::Rendered(output) => {
                present(
                    self.surface.as_ref(),
                    &output.defs,
                    &output.paths,
                    &output.background,
                );
                self.frame.advance();
                refresh_textures(self.surface.as_ref(), &output.texture_ids);
                Ok(StepOutcome::Rendered { frame: world.frame })
            }
            FrameReply::NotReady => Ok(StepOutcome::Idle),
            FrameReply::Failed(_) => Ok(StepOutcome::Skipped { frame: world.frame }),
        }
    }

    /// Runs until stopped. Ends early only if the session actor is gone.
    pub async fn run(mut self) -> Result<FrameCounter, SessionError> {
        tracing::info!("Starting render loop");

        while !self.stopper.is_stopped() {
            self.clock.next_frame().await;
            if let Err(err) = self.step().await {
                tracing::error!(error = %err, frame = self.frame.current(), "Render loop lost its session");
                return Err(err);
            }
        }

        tracing::info!(frames = self.frame.completed(), "Render loop stopped");
        Ok(self.frame)
    }
}

fn world_frame(frame: u64, input: &InputState) -> WorldFrame {
    WorldFrame {
        frame,
        width: input.viewport.x,
        height: input.viewport.y,
        pointer_x: input.pointer.position.x,
        pointer_y: input.pointer.position.y,
        pointer_down: input.pointer.down,
    }
}
