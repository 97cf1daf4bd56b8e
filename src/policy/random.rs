//! Random replacement: victims come from the pre-loaded integer stream.

use super::{Policy, VictimContext};
use crate::error::SimResult;

/// Draws the next stream value and reduces it modulo the frame count.
/// Holds no state of its own; the stream lives in the simulator and is
/// consumed by nothing else.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for Random {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize> {
        Ok(ctx.rand.next_in(ctx.frames.len()))
    }
}
