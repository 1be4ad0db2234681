use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Source of display-refresh ticks for the render loop.
#[async_trait]
pub trait FrameClock: Send {
    /// Resolves when the next frame should be produced.
    async fn next_frame(&mut self);
}

/// A fixed-rate clock standing in for the display refresh.
///
/// Late ticks are skipped rather than replayed in a burst. Must be created inside a tokio runtime.
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(refresh_hz: f64) -> Self {
        let hz = if refresh_hz.is_finite() && refresh_hz > 0.0 {
            refresh_hz
        } else {
            tracing::warn!(refresh_hz, "Invalid refresh rate, falling back to 60 Hz");
            60.0
        };
        let mut interval = time::interval(Duration::from_secs_f64(1.0 / hz));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}
