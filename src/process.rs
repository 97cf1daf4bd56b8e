//! Processes, their virtual memory areas, and per-process statistics.

use crate::pte::{PageTableEntry, MAX_VPAGES};

/// A contiguous range of virtual pages with uniform permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vma {
    /// First covered vpage (inclusive).
    pub start_vpage: usize,
    /// Last covered vpage (inclusive).
    pub end_vpage: usize,
    /// Writes to covered pages fault with SEGPROT.
    pub write_protect: bool,
    /// Covered pages are file-backed (FIN/FOUT instead of ZERO/OUT).
    pub file_mapped: bool,
}

impl Vma {
    /// True when `vpage` falls inside this area.
    #[inline]
    pub fn contains(&self, vpage: usize) -> bool {
        (self.start_vpage..=self.end_vpage).contains(&vpage)
    }
}

/// Trace-event counters accumulated per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub maps: u64,
    pub unmaps: u64,
    pub ins: u64,
    pub outs: u64,
    pub fins: u64,
    pub fouts: u64,
    pub zeros: u64,
    pub segv: u64,
    pub segprot: u64,
}

/// One simulated process: its address-space segmentation, page table, and
/// statistics. Processes are created at startup and never destroyed; exit
/// only unmaps pages.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: usize,
    pub vmas: Vec<Vma>,
    pub page_table: [PageTableEntry; MAX_VPAGES],
    pub stats: ProcessStats,
}

impl Process {
    /// A process with no VMAs and an all-clear page table.
    pub fn new(pid: usize) -> Self {
        Self {
            pid,
            vmas: Vec::new(),
            page_table: [PageTableEntry::new(); MAX_VPAGES],
            stats: ProcessStats::default(),
        }
    }

    /// The VMA covering `vpage`, if the page is legal for this process.
    pub fn vma_covering(&self, vpage: usize) -> Option<&Vma> {
        self.vmas.iter().find(|vma| vma.contains(vpage))
    }
}
