//! Run seeded introduction simulations from the command line.
//!
//! ```text
//! RUST_LOG=debug liaison-sim --seed 7 --runs 100 --decline-second --duplicate-rate 0.2
//! ```

use std::process::ExitCode;

use clap::Parser;
use liaison_core::IntroducerState;
use liaison_harness::{
    IntroduceeScript, NetworkConfig,
    scenario::{OracleFn, Scenario, oracle},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "liaison-sim", about = "Deterministic simulation of mediated introductions")]
struct Args {
    /// Seed of the first run; run `n` uses `seed + n`
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of runs
    #[arg(long, default_value_t = 1)]
    runs: u64,

    /// First contact declines
    #[arg(long)]
    decline_first: bool,

    /// Second contact declines
    #[arg(long)]
    decline_second: bool,

    /// Probability that a delivery is duplicated
    #[arg(long, default_value_t = 0.0)]
    duplicate_rate: f64,

    /// Second contact never answers
    #[arg(long)]
    silent_second: bool,
}

impl Args {
    fn scripts(&self) -> (IntroduceeScript, IntroduceeScript) {
        let script = |decline: bool| if decline { IntroduceeScript::decline() } else { IntroduceeScript::accept() };
        let second = if self.silent_second { IntroduceeScript::silent() } else { script(self.decline_second) };
        (script(self.decline_first), second)
    }

    fn oracle(&self) -> OracleFn {
        if self.silent_second {
            oracle::stalled_in(IntroducerState::AwaitResponse2)
        } else if self.duplicate_rate > 0.0 {
            // A duplicated response or ack is out of sequence and aborts.
            oracle::all_of(vec![oracle::settled(), oracle::events_match_responses()])
        } else {
            oracle::all_of(vec![oracle::finished(), oracle::events_match_responses()])
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (first, second) = args.scripts();
    let mut failures = 0u64;
    let mut finished = 0u64;

    for run in 0..args.runs {
        let seed = args.seed.wrapping_add(run);
        let result = Scenario::new("liaison-sim")
            .seed(seed)
            .first("alice", first)
            .second("bob", second)
            .network(NetworkConfig { duplicate_rate: args.duplicate_rate, reorder: true })
            .oracle(args.oracle())
            .run();

        match result {
            Ok(world) => {
                if world.state() == Some(IntroducerState::Finished) {
                    finished += 1;
                }
                info!(
                    seed,
                    state = world.state().map_or("deleted", IntroducerState::name),
                    to_introducer = world.received_by_introducer(),
                    to_contacts = world.received_by_introducees(),
                    duplicates = world.duplicates(),
                    events = world.events().len(),
                    "run passed"
                );
            },
            Err(reason) => {
                failures += 1;
                error!(seed, %reason, "run failed");
            },
        }
    }

    info!(runs = args.runs, finished, failures, "simulation complete");
    if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
