//! The simulator core: instruction engine, page-fault handler, and cost
//! accounting.
//!
//! Strictly single-threaded and synchronous. Each operation completes all
//! of its side effects (trace emission, statistics, PTE/FTE mutation,
//! policy bookkeeping) before the next begins; given identical inputs the
//! entire output is byte-reproducible.

use crate::error::{SimError, SimResult};
use crate::frame::{FramePool, FrameTableEntry};
use crate::policy::{Policy, VictimContext};
use crate::process::Process;
use crate::pte::MAX_VPAGES;
use crate::randstream::RandomStream;
use crate::report::{self, Totals};
use crate::workload::{Instruction, Workload};
use std::io::Write;

/// Event costs, in the units of the total-cost accumulator.
pub mod cost {
    pub const READ_WRITE: u64 = 1;
    pub const CTX_SWITCH: u64 = 130;
    pub const PROCESS_EXIT: u64 = 1230;
    pub const MAP: u64 = 350;
    pub const UNMAP: u64 = 410;
    pub const IN: u64 = 3200;
    pub const OUT: u64 = 2750;
    pub const FIN: u64 = 2350;
    pub const FOUT: u64 = 2800;
    pub const ZERO: u64 = 150;
    pub const SEGV: u64 = 440;
    pub const SEGPROT: u64 = 410;
}

/// Decoded `-o` option letters.
///
/// `sequence` preserves the order the letters were given; the per-operation
/// dumps and the final report blocks replay in that order.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// `O`: per-operation trace lines.
    pub trace: bool,
    /// `a`: policy ASELECT diagnostics.
    pub aselect: bool,
    /// Any of `x`/`y`/`f` present.
    per_operation_dumps: bool,
    sequence: Vec<char>,
}

impl OutputOptions {
    /// Decode an option string; any letter outside {O,P,F,S,x,y,f,a} is
    /// fatal.
    pub fn parse(letters: &str) -> SimResult<Self> {
        let mut opts = Self::default();
        for ch in letters.chars() {
            match ch {
                'O' => opts.trace = true,
                'a' => opts.aselect = true,
                'x' | 'y' | 'f' => opts.per_operation_dumps = true,
                'P' | 'F' | 'S' => {}
                other => return Err(SimError::UnknownOption(other)),
            }
            opts.sequence.push(ch);
        }
        Ok(opts)
    }
}

/// The virtual MMU: frame table, free pool, processes, the active
/// replacement policy, and the output sink.
pub struct Simulator<W: Write> {
    frames: Vec<FrameTableEntry>,
    pool: FramePool,
    processes: Vec<Process>,
    instructions: Vec<Instruction>,
    policy: Box<dyn Policy>,
    rand: RandomStream,
    opts: OutputOptions,
    out: W,
    current: Option<usize>,
    inst_count: u64,
    total_cost: u64,
    ctx_switches: u64,
    process_exits: u64,
}

impl<W: Write> Simulator<W> {
    pub fn new(
        num_frames: usize,
        workload: Workload,
        rand: RandomStream,
        policy: Box<dyn Policy>,
        opts: OutputOptions,
        out: W,
    ) -> Self {
        Self {
            frames: vec![FrameTableEntry::default(); num_frames],
            pool: FramePool::new(num_frames),
            processes: workload.processes,
            instructions: workload.instructions,
            policy,
            rand,
            opts,
            out,
            current: None,
            inst_count: 0,
            total_cost: 0,
            ctx_switches: 0,
            process_exits: 0,
        }
    }

    /// Drive the whole trace, then emit the final report blocks in the
    /// order their option letters were given.
    pub fn run(&mut self) -> SimResult<()> {
        for idx in 0..self.instructions.len() {
            let instr = self.instructions[idx];
            self.inst_count += 1;
            if self.opts.trace {
                writeln!(
                    self.out,
                    "{}: ==> {} {}",
                    self.inst_count - 1,
                    instr.opcode(),
                    instr.operand()
                )?;
            }

            match instr {
                Instruction::ContextSwitch(pid) => self.context_switch(pid),
                Instruction::Read(vpage) => self.memory_access(vpage, false)?,
                Instruction::Write(vpage) => self.memory_access(vpage, true)?,
                Instruction::Exit(pid) => self.process_exit(pid)?,
            }

            if self.opts.per_operation_dumps {
                self.per_operation_dumps()?;
            }
        }
        self.final_reports()
    }

    fn context_switch(&mut self, pid: usize) {
        if self.current != Some(pid) {
            self.ctx_switches += 1;
            self.total_cost += cost::CTX_SWITCH;
        }
        self.current = Some(pid);
    }

    fn memory_access(&mut self, vpage: i64, write: bool) -> SimResult<()> {
        self.total_cost += cost::READ_WRITE;

        let cur = self.current.ok_or_else(|| {
            SimError::Invariant("memory access before any context switch".to_string())
        })?;

        if !(0..MAX_VPAGES as i64).contains(&vpage) {
            if self.opts.trace {
                writeln!(self.out, " SEGV")?;
            }
            self.processes[cur].stats.segv += 1;
            self.total_cost += cost::SEGV;
            return Ok(());
        }
        let vpage = vpage as usize;

        if !self.processes[cur].page_table[vpage].present() {
            self.page_fault(cur, vpage)?;
            if !self.processes[cur].page_table[vpage].present() {
                // SEGV already recorded by the fault handler.
                return Ok(());
            }
        }

        if write && self.processes[cur].page_table[vpage].write_protect() {
            if self.opts.trace {
                writeln!(self.out, " SEGPROT")?;
            }
            // The access still references the page.
            self.processes[cur].page_table[vpage].set_referenced(true);
            self.processes[cur].stats.segprot += 1;
            self.total_cost += cost::SEGPROT;
            return Ok(());
        }

        let pte = &mut self.processes[cur].page_table[vpage];
        pte.set_referenced(true);
        if write {
            pte.set_modified(true);
        }
        let frame = pte.frame();
        self.policy.note_access(frame, self.inst_count);
        Ok(())
    }

    /// Map `vpage` for process `cur`, evicting if no frame is free.
    /// Precondition: the PTE is not present. On an illegal page this
    /// records SEGV and leaves the PTE untouched; the caller re-checks
    /// `present`.
    fn page_fault(&mut self, cur: usize, vpage: usize) -> SimResult<()> {
        if self.processes[cur].vma_covering(vpage).is_none() {
            if self.opts.trace {
                writeln!(self.out, " SEGV")?;
            }
            self.processes[cur].stats.segv += 1;
            self.total_cost += cost::SEGV;
            return Ok(());
        }

        let frame = self.acquire_frame()?;
        if let Some((old_pid, old_vpage)) = self.frames[frame].owner {
            self.evict(frame, old_pid, old_vpage)?;
        }

        self.frames[frame].owner = Some((cur, vpage));
        {
            let pte = &mut self.processes[cur].page_table[vpage];
            pte.set_present(true);
            pte.set_frame(frame);
        }

        if !self.processes[cur].page_table[vpage].initialized() {
            let vma = *self.processes[cur].vma_covering(vpage).ok_or_else(|| {
                SimError::Invariant(format!("no VMA covers legal vpage {vpage}"))
            })?;
            let pte = &mut self.processes[cur].page_table[vpage];
            pte.set_write_protect(vma.write_protect);
            pte.set_file_mapped(vma.file_mapped);
            pte.set_initialized(true);
        }

        let pte = self.processes[cur].page_table[vpage];
        if pte.file_mapped() {
            if self.opts.trace {
                writeln!(self.out, " FIN")?;
            }
            self.processes[cur].stats.fins += 1;
            self.total_cost += cost::FIN;
        } else if pte.paged_out() {
            if self.opts.trace {
                writeln!(self.out, " IN")?;
            }
            self.processes[cur].stats.ins += 1;
            self.total_cost += cost::IN;
        } else {
            if self.opts.trace {
                writeln!(self.out, " ZERO")?;
            }
            self.processes[cur].stats.zeros += 1;
            self.total_cost += cost::ZERO;
        }

        if self.opts.trace {
            writeln!(self.out, " MAP {frame}")?;
        }
        self.processes[cur].stats.maps += 1;
        self.total_cost += cost::MAP;

        self.policy.note_mapped(frame, self.inst_count);
        Ok(())
    }

    /// Unmap the old occupant of `frame`, pushing a dirty copy to its
    /// backing store.
    fn evict(&mut self, frame: usize, old_pid: usize, old_vpage: usize) -> SimResult<()> {
        if self.opts.trace {
            writeln!(self.out, " UNMAP {old_pid}:{old_vpage}")?;
        }
        self.processes[old_pid].stats.unmaps += 1;
        self.total_cost += cost::UNMAP;

        let old = self.processes[old_pid].page_table[old_vpage];
        if old.modified() {
            if old.file_mapped() {
                if self.opts.trace {
                    writeln!(self.out, " FOUT")?;
                }
                self.processes[old_pid].stats.fouts += 1;
                self.total_cost += cost::FOUT;
            } else {
                if self.opts.trace {
                    writeln!(self.out, " OUT")?;
                }
                self.processes[old_pid].stats.outs += 1;
                self.total_cost += cost::OUT;
                self.processes[old_pid].page_table[old_vpage].set_paged_out(true);
            }
            self.processes[old_pid].page_table[old_vpage].set_modified(false);
        }

        let pte = &mut self.processes[old_pid].page_table[old_vpage];
        pte.set_present(false);
        pte.set_frame(0);
        pte.set_referenced(false);
        self.frames[frame].owner = None;
        Ok(())
    }

    /// Pop the free list, or ask the policy for a victim. The returned
    /// frame may still be occupied; eviction is the caller's job.
    fn acquire_frame(&mut self) -> SimResult<usize> {
        if let Some(frame) = self.pool.acquire() {
            return Ok(frame);
        }
        let Self {
            policy,
            frames,
            processes,
            rand,
            out,
            inst_count,
            ..
        } = self;
        let mut ctx = VictimContext {
            frames: frames.as_slice(),
            processes: processes.as_mut_slice(),
            now: *inst_count,
            rand,
            out,
        };
        policy.select_victim(&mut ctx)
    }

    fn process_exit(&mut self, pid: usize) -> SimResult<()> {
        for vpage in 0..MAX_VPAGES {
            let pte = self.processes[pid].page_table[vpage];
            if pte.present() {
                let frame = pte.frame();
                if self.opts.trace {
                    writeln!(self.out, " UNMAP {pid}:{vpage}")?;
                }
                self.processes[pid].stats.unmaps += 1;
                self.total_cost += cost::UNMAP;

                // Dirty anonymous pages of a dying process are discarded,
                // never swapped; dirty file-mapped pages still reach the
                // file.
                if pte.modified() && pte.file_mapped() {
                    if self.opts.trace {
                        writeln!(self.out, " FOUT")?;
                    }
                    self.processes[pid].stats.fouts += 1;
                    self.total_cost += cost::FOUT;
                }

                self.frames[frame].owner = None;
                self.pool.release(frame);
            }

            let pte = &mut self.processes[pid].page_table[vpage];
            pte.set_present(false);
            pte.set_referenced(false);
            pte.set_modified(false);
            pte.set_frame(0);
            pte.set_paged_out(false);
        }

        if self.opts.trace {
            writeln!(self.out, " EXIT")?;
        }
        self.process_exits += 1;
        self.total_cost += cost::PROCESS_EXIT;
        Ok(())
    }

    fn per_operation_dumps(&mut self) -> SimResult<()> {
        for idx in 0..self.opts.sequence.len() {
            match self.opts.sequence[idx] {
                'x' => {
                    if let Some(cur) = self.current {
                        report::page_table(&mut self.out, &self.processes[cur])?;
                    }
                }
                'y' => report::all_page_tables(&mut self.out, &self.processes)?,
                'f' => report::frame_table(&mut self.out, &self.frames)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn final_reports(&mut self) -> SimResult<()> {
        for idx in 0..self.opts.sequence.len() {
            match self.opts.sequence[idx] {
                'P' => report::all_page_tables(&mut self.out, &self.processes)?,
                'F' => report::frame_table(&mut self.out, &self.frames)?,
                'S' => {
                    let totals = self.totals();
                    report::summary(&mut self.out, &self.processes, totals)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Global counters as reported on the TOTALCOST line.
    pub fn totals(&self) -> Totals {
        Totals {
            inst_count: self.inst_count,
            ctx_switches: self.ctx_switches,
            process_exits: self.process_exits,
            total_cost: self.total_cost,
        }
    }

    pub fn frames(&self) -> &[FrameTableEntry] {
        &self.frames
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Free frames remaining in the pool.
    pub fn free_frames(&self) -> usize {
        self.pool.len()
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Hand back the output sink.
    pub fn into_writer(self) -> W {
        self.out
    }
}
