//! FIFO replacement: evict frames in mapping order.

use super::{Policy, VictimContext};
use crate::error::SimResult;

/// Round-robin over the frame table. No PTE inspection; the hand alone
/// decides.
#[derive(Debug, Default)]
pub struct Fifo {
    hand: usize,
}

impl Fifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize> {
        let victim = self.hand;
        self.hand = (victim + 1) % ctx.frames.len();
        Ok(victim)
    }
}
