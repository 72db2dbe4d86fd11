//! CSV sweep harness: runs the simulation across a range of node counts
//! and prints one CSV row per run. A second binary alongside `main`,
//! built on the same library; the core simulation crate itself has no
//! notion of CSV output or sweeps.

use std::error::Error;

use clap::Parser;

use chord_ring_sim::ring::{self, RingConfig};
use chord_ring_sim::supervisor::{self, message::InitOutcome, message::SimulationOutcome, stats};
use chord_ring_sim::utils::constants::DEFAULT_SEED;

#[derive(Parser, Debug)]
#[command(name = "sweep", about = "Runs the Chord ring simulation across a range of node counts and prints CSV rows")]
struct Cli {
    /// Comma-separated list of node counts to sweep, e.g. "1,10,100,1024".
    #[arg(long, value_delimiter = ',', default_value = "1,10,100,1024")]
    node_counts: Vec<usize>,

    /// Requests issued per node for every sweep point.
    #[arg(long, default_value_t = 10)]
    requests_per_node: usize,

    #[arg(long, default_value_t = RingConfig::DEFAULT_BITS)]
    bits: u32,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = RingConfig::new(cli.bits);

    println!("n,requests,total_requests,successful,avg_hops,theoretical_hops,duration_ms,verdict");

    for &n in &cli.node_counts {
        if n == 0 {
            eprintln!("skipping sweep point n=0: node counts must be positive");
            continue;
        }

        let handle = supervisor::spawn_supervisor(n, config, cli.seed);
        if let InitOutcome::InitFailed(reason) = handle.initialize_nodes().await {
            eprintln!("skipping sweep point n={n}: initialization failed ({reason})");
            handle.shutdown();
            continue;
        }

        let node_ids = ring::generate_ids(n, &config);
        match handle.start_simulation(node_ids, cli.requests_per_node).await {
            SimulationOutcome::SimulationComplete(result) => {
                let theoretical = stats::theoretical_hops(n);
                let verdict = result.verdict(theoretical);
                println!(
                    "{n},{},{},{},{:.4},{:.4},{},{verdict}",
                    cli.requests_per_node,
                    result.total_requests,
                    result.successful_lookups,
                    result.avg_hops(),
                    theoretical,
                    result.duration_ms,
                );
            }
            SimulationOutcome::SimulationFailed(reason) => {
                eprintln!("sweep point n={n} failed: {reason}");
            }
        }
        handle.shutdown();
    }

    Ok(())
}
