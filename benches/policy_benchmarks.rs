//! Criterion benchmarks for the replacement policies.
//!
//! Each benchmark drives the same thrashing workload through one policy
//! so their victim-selection costs can be compared.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paginar::{OutputOptions, PolicyKind, RandomStream, Simulator, Workload};
use std::io;
use std::path::Path;

const NUM_FRAMES: usize = 16;

/// A workload that overcommits the frame pool so every policy is forced
/// to select victims constantly.
fn thrashing_workload(accesses: usize) -> Workload {
    let mut input = String::from("2\n1\n0 63 0 0\n1\n0 63 0 0\n");
    for i in 0..accesses {
        if i % 37 == 0 {
            input.push_str(&format!("c {}\n", (i / 37) % 2));
        }
        let vpage = (i * 7) % 64;
        if i % 3 == 0 {
            input.push_str(&format!("w {vpage}\n"));
        } else {
            input.push_str(&format!("r {vpage}\n"));
        }
    }
    Workload::parse(&input, Path::new("bench.in")).expect("bench workload parses")
}

fn run_policy(workload: &Workload, flag: &str) {
    let rand = RandomStream::from_values((0u64..997).map(|v| v * 31 % 127).collect());
    let opts = OutputOptions::parse("").expect("options");
    let policy = PolicyKind::from_flag(flag)
        .expect("policy flag")
        .build(NUM_FRAMES, false);
    let mut sim = Simulator::new(
        NUM_FRAMES,
        workload.clone(),
        rand,
        policy,
        opts,
        io::sink(),
    );
    sim.run().expect("simulation completes");
    black_box(sim.total_cost());
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("policies");
    let workload = thrashing_workload(5_000);

    for flag in ["f", "r", "c", "e", "a", "w"] {
        group.bench_with_input(BenchmarkId::new("thrash", flag), &flag, |b, flag| {
            b.iter(|| run_policy(black_box(&workload), flag));
        });
    }

    group.finish();
}

fn bench_workload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("workload_size");

    for size in [1_000usize, 5_000, 20_000] {
        let workload = thrashing_workload(size);
        group.bench_with_input(BenchmarkId::new("clock", size), &size, |b, _| {
            b.iter(|| run_policy(black_box(&workload), "c"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_policies, bench_workload_sizes);
criterion_main!(benches);
