//! paginar: a deterministic virtual-memory paging simulator.
//!
//! Drives a trace of memory operations against a set of processes, each
//! with its own virtual address space, over a shared pool of physical
//! frames. Page faults are resolved by one of six replacement policies
//! (FIFO, Random, Clock, NRU, Aging, Working-Set) behind a uniform
//! victim-selection contract, and every transition is emitted as a
//! byte-exact trace line.
//!
//! # Example
//!
//! ```rust
//! use paginar::{OutputOptions, PolicyKind, RandomStream, Simulator, Workload};
//! use std::path::Path;
//!
//! let input = "1\n1\n0 3 0 0\nc 0\nr 0\nr 1\n";
//! let workload = Workload::parse(input, Path::new("inline")).unwrap();
//! let rand = RandomStream::from_values(vec![1, 2, 3]);
//! let opts = OutputOptions::parse("O").unwrap();
//! let policy = PolicyKind::Fifo.build(4, false);
//!
//! let mut sim = Simulator::new(4, workload, rand, policy, opts, Vec::new());
//! sim.run().unwrap();
//!
//! let trace = String::from_utf8(sim.into_writer()).unwrap();
//! assert!(trace.starts_with("0: ==> c 0\n1: ==> r 0\n ZERO\n MAP 0\n"));
//! ```

pub mod error;
pub mod frame;
pub mod policy;
pub mod process;
pub mod pte;
pub mod randstream;
pub mod report;
pub mod sim;
pub mod workload;

// Re-exports for convenience
pub use error::{SimError, SimResult};
pub use frame::{FramePool, FrameTableEntry, MAX_FRAMES};
pub use policy::{Policy, PolicyKind, VictimContext};
pub use process::{Process, ProcessStats, Vma};
pub use pte::{PageTableEntry, MAX_VPAGES};
pub use randstream::RandomStream;
pub use report::Totals;
pub use sim::{cost, OutputOptions, Simulator};
pub use workload::{Instruction, Workload};
