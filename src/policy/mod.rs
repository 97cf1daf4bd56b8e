//! Page-replacement policies.
//!
//! Six algorithms share one victim-selection contract. Policies own all of
//! their private state (hands, age counters, timestamps); the page tables
//! and the global instruction counter are borrowed per call through
//! [`VictimContext`], never stored.

mod aging;
mod clock;
mod fifo;
mod nru;
mod random;
mod working_set;

pub use aging::Aging;
pub use clock::Clock;
pub use fifo::Fifo;
pub use nru::Nru;
pub use random::Random;
pub use working_set::WorkingSet;

use crate::error::{SimError, SimResult};
use crate::frame::FrameTableEntry;
use crate::process::Process;
use crate::pte::PageTableEntry;
use crate::randstream::RandomStream;
use std::io::Write;

/// Borrowed state a policy may consult while choosing a victim.
pub struct VictimContext<'a> {
    /// The frame table. All frames are occupied when selection runs.
    pub frames: &'a [FrameTableEntry],
    /// All processes; policies read and clear `referenced` bits here.
    pub processes: &'a mut [Process],
    /// Global instruction counter.
    pub now: u64,
    /// The pre-loaded integer stream. Consumed only by Random.
    pub rand: &'a mut RandomStream,
    /// Trace sink for ASELECT diagnostics.
    pub out: &'a mut dyn Write,
}

impl VictimContext<'_> {
    /// Reverse-map a frame to its owning (pid, vpage). A free frame here
    /// means the frame pool handed out a stale entry.
    pub fn owner_of(&self, frame: usize) -> SimResult<(usize, usize)> {
        self.frames[frame]
            .owner
            .ok_or_else(|| SimError::Invariant(format!("frame {frame} has no owner")))
    }

    /// The PTE backing an occupied frame.
    pub fn pte_of(&mut self, frame: usize) -> SimResult<&mut PageTableEntry> {
        let (pid, vpage) = self.owner_of(frame)?;
        Ok(&mut self.processes[pid].page_table[vpage])
    }
}

/// Victim selection under a uniform contract.
///
/// Precondition of [`select_victim`](Policy::select_victim): every frame is
/// occupied. The returned frame is still mapped; eviction is the caller's
/// responsibility. A policy that cannot produce a victim reports an
/// invariant violation, never a silent fallback.
pub trait Policy {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Choose the frame to evict.
    fn select_victim(&mut self, ctx: &mut VictimContext<'_>) -> SimResult<usize>;

    /// A page was just mapped into `frame` (Aging resets its counter,
    /// Working-Set stamps `last_used`).
    fn note_mapped(&mut self, _frame: usize, _now: u64) {}

    /// A present page in `frame` was successfully accessed (Working-Set
    /// refreshes `last_used`).
    fn note_access(&mut self, _frame: usize, _now: u64) {}
}

/// Which replacement algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    Random,
    Clock,
    Nru,
    Aging,
    WorkingSet,
}

impl PolicyKind {
    /// Decode the `-a` flag letter.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "f" => Some(Self::Fifo),
            "r" => Some(Self::Random),
            "c" => Some(Self::Clock),
            "e" => Some(Self::Nru),
            "a" => Some(Self::Aging),
            "w" => Some(Self::WorkingSet),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Random => "Random",
            Self::Clock => "Clock",
            Self::Nru => "NRU",
            Self::Aging => "Aging",
            Self::WorkingSet => "Working-Set",
        }
    }

    /// Construct the policy. `aselect` enables the per-selection
    /// diagnostic lines of the scanning policies.
    pub fn build(self, num_frames: usize, aselect: bool) -> Box<dyn Policy> {
        match self {
            Self::Fifo => Box::new(Fifo::new()),
            Self::Random => Box::new(Random::new()),
            Self::Clock => Box::new(Clock::new()),
            Self::Nru => Box::new(Nru::new(aselect)),
            Self::Aging => Box::new(Aging::new(num_frames, aselect)),
            Self::WorkingSet => Box::new(WorkingSet::new(num_frames, aselect)),
        }
    }
}
