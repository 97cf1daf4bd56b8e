//! Clock replacement: second chance via the referenced bit.

use super::{Policy, VictimContext};
use crate::error::SimResult;

/// Walks the hand forward, clearing `referenced` bits until it finds a
/// frame without one. Terminates because scanning clears bits.
#[derive(Debug, Default)]
pub struct Clock {
    hand: usize,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Clock {
    fn name(&self) -> &'static str {
        "Clock"
    }

    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize> {
        let num_frames = ctx.frames.len();
        loop {
            let frame = self.hand;
            let pte = ctx.pte_of(frame)?;
            if !pte.referenced() {
                self.hand = (frame + 1) % num_frames;
                return Ok(frame);
            }
            pte.set_referenced(false);
            self.hand = (self.hand + 1) % num_frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::testutil::{full_rig, select};

    #[test]
    fn test_clock_picks_first_unreferenced_frame() {
        let (frames, mut procs) = full_rig(4);
        procs[0].page_table[0].set_referenced(true);
        procs[0].page_table[1].set_referenced(true);

        let mut clock = Clock::new();
        assert_eq!(select(&mut clock, &frames, &mut procs, 0).0, 2);
        // The skipped frames lost their second chance.
        assert!(!procs[0].page_table[0].referenced());
        assert!(!procs[0].page_table[1].referenced());
    }

    #[test]
    fn test_clock_full_lap_when_everything_referenced() {
        let (frames, mut procs) = full_rig(3);
        for vpage in 0..3 {
            procs[0].page_table[vpage].set_referenced(true);
        }
        let mut clock = Clock::new();
        // All bits cleared during the lap; the hand's own frame wins.
        assert_eq!(select(&mut clock, &frames, &mut procs, 0).0, 0);
        assert!((0..3).all(|v| !procs[0].page_table[v].referenced()));
    }

    #[test]
    fn test_clock_hand_advances_past_victim() {
        let (frames, mut procs) = full_rig(3);
        let mut clock = Clock::new();
        assert_eq!(select(&mut clock, &frames, &mut procs, 0).0, 0);
        assert_eq!(select(&mut clock, &frames, &mut procs, 1).0, 1);
    }
}
