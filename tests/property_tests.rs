//! Property-based tests for the simulator.
//!
//! Random small workloads are driven through every replacement policy and
//! the structural invariants are checked at the quiescent end state.

use paginar::{cost, OutputOptions, PolicyKind, RandomStream, Simulator, Workload};
use proptest::prelude::*;
use std::path::Path;

const POLICY_FLAGS: [&str; 6] = ["f", "r", "c", "e", "a", "w"];
const RANDS: &[u64] = &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];

// ============================================================================
// Workload Generation Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Switch(usize),
    Read(i64),
    Write(i64),
    Exit(usize),
}

/// Operations over two processes. Page numbers run past both the VMA
/// holes and the page-table bound so SEGV paths get exercised too.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0usize..2).prop_map(Op::Switch),
        5 => (0i64..80).prop_map(Op::Read),
        4 => (0i64..80).prop_map(Op::Write),
        1 => (0usize..2).prop_map(Op::Exit),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..60)
}

/// Two processes, each with an anonymous VMA and a write-protected
/// file-mapped VMA, plus a leading context switch so the engine always
/// has a current process.
fn build_input(ops: &[Op]) -> String {
    let mut text = String::from("2\n");
    for _ in 0..2 {
        text.push_str("2\n0 15 0 0\n20 30 1 1\n");
    }
    text.push_str("c 0\n");
    for op in ops {
        match op {
            Op::Switch(pid) => text.push_str(&format!("c {pid}\n")),
            Op::Read(vpage) => text.push_str(&format!("r {vpage}\n")),
            Op::Write(vpage) => text.push_str(&format!("w {vpage}\n")),
            Op::Exit(pid) => text.push_str(&format!("e {pid}\n")),
        }
    }
    text
}

fn simulate(input: &str, frames: usize, flag: &str) -> Simulator<Vec<u8>> {
    let workload = Workload::parse(input, Path::new("prop.in")).expect("generated input parses");
    let rand = RandomStream::from_values(RANDS.to_vec());
    let opts = OutputOptions::parse("O").expect("options");
    let policy = PolicyKind::from_flag(flag)
        .expect("policy flag")
        .build(frames, false);
    let mut sim = Simulator::new(frames, workload, rand, policy, opts, Vec::new());
    sim.run().expect("simulation completes");
    sim
}

fn read_write_count(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| matches!(op, Op::Read(_) | Op::Write(_)))
        .count() as u64
}

// ============================================================================
// Structural Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_frame_accounting_and_reverse_mapping(
        ops in ops_strategy(),
        frames in 1usize..5,
    ) {
        let input = build_input(&ops);
        for flag in POLICY_FLAGS {
            let sim = simulate(&input, frames, flag);

            let occupied = sim.frames().iter().filter(|f| f.occupied()).count();
            prop_assert_eq!(
                occupied + sim.free_frames(),
                frames,
                "occupancy imbalance under policy {}",
                flag
            );

            for proc in sim.processes() {
                for (vpage, pte) in proc.page_table.iter().enumerate() {
                    if pte.present() {
                        prop_assert_eq!(
                            sim.frames()[pte.frame()].owner,
                            Some((proc.pid, vpage)),
                            "broken reverse map under policy {}",
                            flag
                        );
                    }
                }
            }
            for (index, fte) in sim.frames().iter().enumerate() {
                if let Some((pid, vpage)) = fte.owner {
                    let pte = sim.processes()[pid].page_table[vpage];
                    prop_assert!(pte.present());
                    prop_assert_eq!(pte.frame(), index);
                }
            }
        }
    }

    #[test]
    fn prop_total_cost_matches_event_counters(
        ops in ops_strategy(),
        frames in 1usize..5,
    ) {
        let input = build_input(&ops);
        let read_writes = read_write_count(&ops);
        for flag in POLICY_FLAGS {
            let sim = simulate(&input, frames, flag);
            let totals = sim.totals();

            let per_process: u64 = sim
                .processes()
                .iter()
                .map(|p| {
                    let s = &p.stats;
                    s.maps * cost::MAP
                        + s.unmaps * cost::UNMAP
                        + s.ins * cost::IN
                        + s.outs * cost::OUT
                        + s.fins * cost::FIN
                        + s.fouts * cost::FOUT
                        + s.zeros * cost::ZERO
                        + s.segv * cost::SEGV
                        + s.segprot * cost::SEGPROT
                })
                .sum();
            let reconstructed = per_process
                + read_writes * cost::READ_WRITE
                + totals.ctx_switches * cost::CTX_SWITCH
                + totals.process_exits * cost::PROCESS_EXIT;

            prop_assert_eq!(totals.total_cost, reconstructed, "cost drift under policy {}", flag);
        }
    }

    #[test]
    fn prop_exited_process_leaves_no_swap(
        ops in ops_strategy(),
        frames in 1usize..5,
    ) {
        // Force a final exit of both processes.
        let mut ops = ops;
        ops.push(Op::Exit(0));
        ops.push(Op::Exit(1));
        let input = build_input(&ops);

        for flag in POLICY_FLAGS {
            let sim = simulate(&input, frames, flag);
            for proc in sim.processes() {
                prop_assert!(
                    proc.page_table.iter().all(|p| !p.present() && !p.paged_out()),
                    "residue after exit under policy {}",
                    flag
                );
            }
            prop_assert_eq!(sim.free_frames(), frames);
        }
    }

    #[test]
    fn prop_simulation_is_deterministic(
        ops in ops_strategy(),
        frames in 1usize..5,
    ) {
        let input = build_input(&ops);
        for flag in POLICY_FLAGS {
            let first = simulate(&input, frames, flag).into_writer();
            let second = simulate(&input, frames, flag).into_writer();
            prop_assert_eq!(&first, &second, "nondeterministic trace under policy {}", flag);
        }
    }
}
