//! paginar CLI: drive a paging trace and print the grader-visible output.

use clap::Parser;
use paginar::{
    OutputOptions, PolicyKind, RandomStream, SimError, SimResult, Simulator, Workload, MAX_FRAMES,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paginar")]
#[command(about = "Deterministic virtual-memory paging simulator")]
#[command(version)]
struct Cli {
    /// Number of physical frames
    #[arg(short = 'f', long = "frames", default_value_t = 128)]
    frames: usize,

    /// Replacement algorithm: f FIFO, r Random, c Clock, e NRU, a Aging,
    /// w Working-Set
    #[arg(short = 'a', long = "algo", default_value = "f")]
    algorithm: String,

    /// Output options, any subset of OPFSxyfa
    #[arg(short = 'o', long = "options", default_value = "")]
    options: String,

    /// Simulation input file (processes, VMAs, instruction trace)
    input: PathBuf,

    /// Random number file feeding the Random policy
    rfile: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("paginar: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> SimResult<()> {
    if !(1..=MAX_FRAMES).contains(&cli.frames) {
        return Err(SimError::InvalidFrameCount(cli.frames));
    }
    let opts = OutputOptions::parse(&cli.options)?;
    let kind = PolicyKind::from_flag(&cli.algorithm)
        .ok_or_else(|| SimError::UnknownPolicy(cli.algorithm.clone()))?;

    let workload = Workload::load(&cli.input)?;
    let rand = RandomStream::load(&cli.rfile)?;
    if kind == PolicyKind::Random && rand.is_empty() {
        return Err(SimError::EmptyRandomPool(cli.rfile.clone()));
    }

    tracing::debug!(frames = cli.frames, policy = kind.name(), "configured simulator");

    let policy = kind.build(cli.frames, opts.aselect);
    let stdout = io::stdout();
    let mut sim = Simulator::new(
        cli.frames,
        workload,
        rand,
        policy,
        opts,
        io::BufWriter::new(stdout.lock()),
    );
    sim.run()?;
    sim.into_writer().flush()?;
    Ok(())
}
