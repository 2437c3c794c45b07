// Demonstration: train independent Q-learners on the default 10-agent grid
// and print the training summary plus the learned greedy rollout.
//
// Build/run from the repo root:
//   cargo run --example train_demo -- --episodes 500 --seed 42 --policy epsilon
//
// Log verbosity follows RUST_LOG (default: info).

use std::env;

use gridmarl::{
    EpisodeRunner, EpsilonGreedyPolicy, NoopObserver, Policy, RandomPolicy, SimulationConfig,
    SimulationContext,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("epsilon");
    let episodes: u32 = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = SimulationConfig {
        episodes,
        seed,
        ..SimulationConfig::default()
    };

    let ctx = match SimulationContext::new(config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    match policy_name {
        "epsilon" => run(EpisodeRunner::new(
            ctx,
            EpsilonGreedyPolicy::new(config.learning.epsilon),
        )),
        "random" => run(EpisodeRunner::new(ctx, RandomPolicy)),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'epsilon' or 'random'.", other);
            std::process::exit(2);
        }
    }
}

fn run<P: Policy>(mut runner: EpisodeRunner<P>) {
    runner.train(&mut NoopObserver);
    println!("Policy: {}", runner.policy().name());
    println!("{}", runner.history());

    let (record, paths) = runner.evaluate();
    println!("Greedy rollout: {}", record);
    for (agent, path) in paths.iter().enumerate() {
        let cells: Vec<String> = path.iter().map(|c| c.to_string()).collect();
        println!("  agent {}: {}", agent, cells.join(" -> "));
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
