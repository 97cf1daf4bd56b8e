//! Simulation input parser.
//!
//! The input file is line-oriented: `#` lines and blank lines are
//! comments. The first content value is the process count; each process
//! contributes a VMA count followed by that many `start end write_protect
//! file_mapped` lines; everything after is the instruction stream of
//! `op value` pairs with op one of `c`, `r`, `w`, `e`.

use crate::error::{SimError, SimResult};
use crate::process::{Process, Vma};
use crate::pte::MAX_VPAGES;
use std::path::Path;

/// One pre-parsed trace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `c procid`
    ContextSwitch(usize),
    /// `r vpage`
    Read(i64),
    /// `w vpage`
    Write(i64),
    /// `e procid`
    Exit(usize),
}

impl Instruction {
    /// Operation character as it appeared in the input.
    pub fn opcode(&self) -> char {
        match self {
            Self::ContextSwitch(_) => 'c',
            Self::Read(_) => 'r',
            Self::Write(_) => 'w',
            Self::Exit(_) => 'e',
        }
    }

    /// Integer operand as it appeared in the input.
    pub fn operand(&self) -> i64 {
        match *self {
            Self::ContextSwitch(pid) | Self::Exit(pid) => pid as i64,
            Self::Read(vpage) | Self::Write(vpage) => vpage,
        }
    }
}

/// A fully parsed simulation input: the process set and the trace.
#[derive(Debug, Clone)]
pub struct Workload {
    pub processes: Vec<Process>,
    pub instructions: Vec<Instruction>,
}

impl Workload {
    /// Read and parse an input file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let workload = Self::parse(&content, path)?;
        tracing::debug!(
            file = %path.display(),
            processes = workload.processes.len(),
            instructions = workload.instructions.len(),
            "loaded workload"
        );
        Ok(workload)
    }

    /// Parse input text. `path` is used for error reporting only.
    pub fn parse(content: &str, path: &Path) -> SimResult<Self> {
        let mut lines = ContentLines::new(content, path);

        let (line_num, line) = lines.expect("process count")?;
        let num_processes: usize = parse_number(line, path, line_num, "process count")?;

        let mut processes = Vec::with_capacity(num_processes);
        for pid in 0..num_processes {
            let (line_num, line) = lines.expect("VMA count")?;
            let num_vmas: usize = parse_number(line, path, line_num, "VMA count")?;

            let mut proc = Process::new(pid);
            for _ in 0..num_vmas {
                let (line_num, line) = lines.expect("VMA definition")?;
                proc.vmas.push(parse_vma(line, path, line_num)?);
            }
            processes.push(proc);
        }

        let mut instructions = Vec::new();
        while let Some((line_num, line)) = lines.next() {
            instructions.push(parse_instruction(line, path, line_num, num_processes)?);
        }

        Ok(Self {
            processes,
            instructions,
        })
    }
}

/// Iterator over non-comment, non-blank lines with 1-based line numbers.
struct ContentLines<'a> {
    file: &'a Path,
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> ContentLines<'a> {
    fn new(content: &'a str, file: &'a Path) -> Self {
        Self {
            file,
            inner: content.lines().enumerate(),
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        for (idx, line) in self.inner.by_ref() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some((idx + 1, trimmed));
        }
        None
    }

    fn expect(&mut self, what: &str) -> SimResult<(usize, &'a str)> {
        self.next().ok_or_else(|| SimError::Parse {
            file: self.file.to_path_buf(),
            line: None,
            cause: format!("unexpected end of file, expected {what}"),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    line: &str,
    path: &Path,
    line_num: usize,
    what: &str,
) -> SimResult<T> {
    let token = line.split_whitespace().next().unwrap_or("");
    token.parse().map_err(|_| SimError::Parse {
        file: path.to_path_buf(),
        line: Some(line_num),
        cause: format!("invalid {what}: {token}"),
    })
}

fn parse_vma(line: &str, path: &Path, line_num: usize) -> SimResult<Vma> {
    let err = |cause: String| SimError::Parse {
        file: path.to_path_buf(),
        line: Some(line_num),
        cause,
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(err(format!(
            "expected 'start end write_protect file_mapped', got '{line}'"
        )));
    }

    let mut numbers = [0usize; 4];
    for (slot, token) in numbers.iter_mut().zip(&fields) {
        *slot = token
            .parse()
            .map_err(|_| err(format!("invalid number: {token}")))?;
    }
    let [start_vpage, end_vpage, write_protect, file_mapped] = numbers;

    if start_vpage > end_vpage || end_vpage >= MAX_VPAGES {
        return Err(err(format!(
            "VMA range {start_vpage}..={end_vpage} outside 0..{MAX_VPAGES}"
        )));
    }

    Ok(Vma {
        start_vpage,
        end_vpage,
        write_protect: write_protect != 0,
        file_mapped: file_mapped != 0,
    })
}

fn parse_instruction(
    line: &str,
    path: &Path,
    line_num: usize,
    num_processes: usize,
) -> SimResult<Instruction> {
    let err = |cause: String| SimError::Parse {
        file: path.to_path_buf(),
        line: Some(line_num),
        cause,
    };

    let mut fields = line.split_whitespace();
    let op = fields.next().unwrap_or("");
    let value = fields
        .next()
        .ok_or_else(|| err(format!("missing operand in '{line}'")))?;

    let procid = |value: &str| -> SimResult<usize> {
        let pid: usize = value
            .parse()
            .map_err(|_| err(format!("invalid process id: {value}")))?;
        if pid >= num_processes {
            return Err(err(format!(
                "process id {pid} out of range, {num_processes} processes declared"
            )));
        }
        Ok(pid)
    };
    let vpage = |value: &str| -> SimResult<i64> {
        value
            .parse()
            .map_err(|_| err(format!("invalid vpage: {value}")))
    };

    match op {
        "c" => Ok(Instruction::ContextSwitch(procid(value)?)),
        "r" => Ok(Instruction::Read(vpage(value)?)),
        "w" => Ok(Instruction::Write(vpage(value)?)),
        "e" => Ok(Instruction::Exit(procid(value)?)),
        other => Err(err(format!("unknown operation '{other}'"))),
    }
}
