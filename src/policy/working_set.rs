//! Working-Set replacement: evict pages outside the working-set window.

use super::{Policy, VictimContext};
use crate::error::{SimError, SimResult};
use std::io::Write;

/// Working-set window in instructions.
const TAU: u64 = 50;

/// Tracks a `last_used` timestamp per frame. The scan refreshes frames
/// whose `referenced` bit is set; an unreferenced frame older than
/// [`TAU`] is selected on sight. When a full lap finds no aged-out frame,
/// the oldest `last_used` seen wins.
#[derive(Debug)]
pub struct WorkingSet {
    hand: usize,
    last_used: Vec<u64>,
    aselect: bool,
}

impl WorkingSet {
    pub fn new(num_frames: usize, aselect: bool) -> Self {
        Self {
            hand: 0,
            last_used: vec![0; num_frames],
            aselect,
        }
    }
}

impl Policy for WorkingSet {
    fn name(&self) -> &'static str {
        "Working-Set"
    }

    fn note_mapped(&mut self, frame: usize, now: u64) {
        self.last_used[frame] = now;
    }

    fn note_access(&mut self, frame: usize, now: u64) {
        self.last_used[frame] = now;
    }

    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize> {
        let num_frames = ctx.frames.len();
        let start = self.hand;

        if self.aselect {
            write!(ctx.out, "ASELECT {start}-{} | ", (start + num_frames - 1) % num_frames)?;
        }

        let mut victim: Option<usize> = None;
        let mut oldest = ctx.now;
        for step in 0..num_frames {
            let frame = (start + step) % num_frames;
            let (pid, vpage) = ctx.owner_of(frame)?;
            let pte = &mut ctx.processes[pid].page_table[vpage];

            if pte.referenced() {
                pte.set_referenced(false);
                self.last_used[frame] = ctx.now;
            } else if ctx.now - self.last_used[frame] >= TAU {
                // Aged out of the working set: take it on sight.
                let referenced = u8::from(pte.referenced());
                victim = Some(frame);
                if self.aselect {
                    write!(
                        ctx.out,
                        "{frame}({referenced} {pid}:{vpage} {}) ",
                        self.last_used[frame]
                    )?;
                }
                break;
            }

            if victim.is_none() || self.last_used[frame] < oldest {
                oldest = self.last_used[frame];
                victim = Some(frame);
            }

            if self.aselect {
                let referenced = u8::from(ctx.processes[pid].page_table[vpage].referenced());
                write!(
                    ctx.out,
                    "{frame}({referenced} {pid}:{vpage} {}) ",
                    self.last_used[frame]
                )?;
            }
        }

        let victim = victim.ok_or_else(|| {
            SimError::Invariant("working-set lap over empty frame table".to_string())
        })?;
        self.hand = (victim + 1) % num_frames;

        if self.aselect {
            writeln!(ctx.out, "| {victim}")?;
        }
        Ok(victim)
    }
}
