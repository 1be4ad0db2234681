use serde::{Deserialize, Serialize};

/// Monotonic frame counter.
///
/// Starts at 1 and advances by exactly one per completed render tick. It is never reset or
/// decremented. A `u64` advanced 60 times a second overflows after roughly 9.7 billion years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameCounter(u64);

impl FrameCounter {
    pub const INITIAL: u64 = 1;

    pub fn new() -> Self {
        Self(Self::INITIAL)
    }

    /// Value to hand to the engine for the current tick.
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Marks the current tick as completed and returns the next value.
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    /// Number of ticks completed so far.
    pub fn completed(&self) -> u64 {
        self.0 - Self::INITIAL
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
