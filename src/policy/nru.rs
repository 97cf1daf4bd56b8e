//! NRU (enhanced second chance) replacement.

use super::{Policy, VictimContext};
use crate::error::{SimError, SimResult};
use std::io::Write;

/// Instructions between reset scans, measured on the global counter.
const RESET_INTERVAL: u64 = 48;

/// Classifies frames by (referenced, modified) into classes 0..=3 and
/// evicts from the lowest populated class. A selection whose distance from
/// the previous reset has reached [`RESET_INTERVAL`] becomes a reset scan:
/// it always walks the full lap and clears every `referenced` bit.
#[derive(Debug)]
pub struct Nru {
    hand: usize,
    last_reset: u64,
    aselect: bool,
}

impl Nru {
    pub fn new(aselect: bool) -> Self {
        Self {
            hand: 0,
            last_reset: 0,
            aselect,
        }
    }
}

impl Policy for Nru {
    fn name(&self) -> &'static str {
        "NRU"
    }

    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize> {
        let num_frames = ctx.frames.len();
        let reset = ctx.now - self.last_reset >= RESET_INTERVAL;
        if reset {
            self.last_reset = ctx.now;
        }

        let start = self.hand;
        let mut first_in_class: [Option<usize>; 4] = [None; 4];
        let mut lowest_class = 4usize;

        for step in 0..num_frames {
            let frame = (start + step) % num_frames;
            let pte = ctx.pte_of(frame)?;
            let class = 2 * usize::from(pte.referenced()) + usize::from(pte.modified());

            if first_in_class[class].is_none() {
                first_in_class[class] = Some(frame);
                if class < lowest_class {
                    lowest_class = class;
                }
            }
            if reset {
                pte.set_referenced(false);
            }
            if !reset && class == 0 {
                break;
            }
        }

        let victim = first_in_class
            .get(lowest_class)
            .and_then(|frame| *frame)
            .ok_or_else(|| {
                SimError::Invariant("NRU lap completed with no class populated".to_string())
            })?;
        self.hand = (victim + 1) % num_frames;

        if self.aselect {
            writeln!(
                ctx.out,
                "ASELECT: {start} {} | {lowest_class} {victim}",
                u8::from(reset)
            )?;
        }
        Ok(victim)
    }
}
