//! Page-table, frame-table, and summary formatting.
//!
//! Every line here is part of the grader-visible output contract; widths,
//! separators, and field order must not drift.

use crate::frame::FrameTableEntry;
use crate::process::Process;
use crate::pte::{PageTableEntry, MAX_VPAGES};
use std::io::{self, Write};

/// Global counters reported on the TOTALCOST line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub inst_count: u64,
    pub ctx_switches: u64,
    pub process_exits: u64,
    pub total_cost: u64,
}

fn page_table_cell(vpage: usize, pte: PageTableEntry) -> String {
    if pte.present() {
        format!(
            "{vpage}:{}{}{}",
            if pte.referenced() { 'R' } else { '-' },
            if pte.modified() { 'M' } else { '-' },
            if pte.paged_out() { 'S' } else { '-' },
        )
    } else if pte.paged_out() {
        "#".to_string()
    } else {
        "*".to_string()
    }
}

/// `PT[pid]:` followed by one cell per vpage.
pub fn page_table<W: Write>(out: &mut W, proc: &Process) -> io::Result<()> {
    write!(out, "PT[{}]:", proc.pid)?;
    for (vpage, pte) in proc.page_table.iter().enumerate() {
        write!(out, " {}", page_table_cell(vpage, *pte))?;
    }
    writeln!(out)
}

/// Page tables of every process, in pid order.
pub fn all_page_tables<W: Write>(out: &mut W, processes: &[Process]) -> io::Result<()> {
    for proc in processes {
        page_table(out, proc)?;
    }
    Ok(())
}

/// `FT:` followed by `pid:vpage` or `*` per frame.
pub fn frame_table<W: Write>(out: &mut W, frames: &[FrameTableEntry]) -> io::Result<()> {
    write!(out, "FT:")?;
    for fte in frames {
        match fte.owner {
            Some((pid, vpage)) => write!(out, " {pid}:{vpage}")?,
            None => write!(out, " *")?,
        }
    }
    writeln!(out)
}

/// Per-process statistics plus the TOTALCOST line.
pub fn summary<W: Write>(out: &mut W, processes: &[Process], totals: Totals) -> io::Result<()> {
    for proc in processes {
        let s = &proc.stats;
        writeln!(
            out,
            "PROC[{}]: U={} M={} I={} O={} FI={} FO={} Z={} SV={} SP={}",
            proc.pid, s.unmaps, s.maps, s.ins, s.outs, s.fins, s.fouts, s.zeros, s.segv, s.segprot
        )?;
    }
    writeln!(
        out,
        "TOTALCOST {} {} {} {} {}",
        totals.inst_count,
        totals.ctx_switches,
        totals.process_exits,
        totals.total_cost,
        std::mem::size_of::<PageTableEntry>()
    )
}
