use std::error::Error;
use std::process::exit;

use clap::Parser;
use log::{info, LevelFilter};

use chord_ring_sim::ring::RingConfig;
use chord_ring_sim::supervisor::message::{InitOutcome, SimulationOutcome};
use chord_ring_sim::supervisor::{self, stats};
use chord_ring_sim::{ring, utils::constants::DEFAULT_SEED};

/// `num_nodes` and `num_requests` are positional and required; the rest
/// are optional flags layered on top.
#[derive(Parser, Debug)]
#[command(name = "chord-ring-sim", about = "Simulates a Chord ring and measures lookup hop counts")]
struct Cli {
    num_nodes: u64,
    num_requests: u64,

    /// Identifier bit-width (ring size = 2^bits).
    #[arg(long, default_value_t = RingConfig::DEFAULT_BITS)]
    bits: u32,

    /// PRNG seed for the workload driver.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Raise the log level to debug.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            println!("Usage: chord-ring-sim <num_nodes> <num_requests>");
            exit(1);
        }
    };

    if cli.num_nodes == 0 || cli.num_requests == 0 {
        println!("num_nodes and num_requests must be positive integers");
        exit(1);
    }

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    simple_logger::SimpleLogger::new().env().with_level(level).init().unwrap();

    let num_nodes = cli.num_nodes as usize;
    let num_requests = cli.num_requests as usize;
    let config = RingConfig::new(cli.bits);

    println!("Chord ring simulation: {num_nodes} nodes, {num_requests} requests/node, {} bits", cli.bits);
    info!("spawning {num_nodes} node actors");

    let handle = supervisor::spawn_supervisor(num_nodes, config, cli.seed);

    match handle.initialize_nodes().await {
        InitOutcome::InitComplete => info!("all nodes acked finger-table initialization"),
        InitOutcome::InitFailed(reason) => {
            println!("Initialization failed: {reason}");
            return Ok(());
        }
    }

    let node_ids = ring::generate_ids(num_nodes, &config);
    match handle.start_simulation(node_ids, num_requests).await {
        SimulationOutcome::SimulationComplete(result) => {
            let theoretical = stats::theoretical_hops(num_nodes);
            let verdict = result.verdict(theoretical);
            println!("Total requests: {}", result.total_requests);
            println!("Successful lookups: {}", result.successful_lookups);
            println!("Total time: {} ms", result.duration_ms);
            println!("Average hops: {:.4}", result.avg_hops());
            println!("Theoretical hops (log2 N): {:.4}", theoretical);
            println!("Verdict: {verdict}");
        }
        SimulationOutcome::SimulationFailed(reason) => {
            println!("Simulation failed: {reason}");
        }
    }

    handle.shutdown();
    Ok(())
}
