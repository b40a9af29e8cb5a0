pub mod collector;
pub mod config;
pub mod csv_graph;
pub mod error;
pub mod nearest;
pub mod synth;
pub mod types;
pub mod workers;

use std::env;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use common::types::Candidate;
use loop_router_core::{StreetGraph, prune::clean_graph};

use collector::LoopCollector;
use csv_graph::CsvGraphSource;
use error::Error;
use synth::SynthGraphSource;
use types::{DataSource, GraphSource};

#[tokio::main]
async fn main() {
    let (profile_name, source) = parse_args();
    let config = config::load_config().expect("Failed to load config");

    match run(&config, &profile_name, &source).await {
        Ok(results) => report(&results),
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse command-line arguments: profile name, then the data source.
fn parse_args() -> (String, DataSource) {
    let args: Vec<String> = env::args().collect();

    let profile = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "walk".to_string());

    let source = args
        .get(2)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "grid".to_string());

    let source = match source.as_str() {
        "grid" => DataSource::Grid,
        "csv" => {
            let nodes = args
                .get(3)
                .expect("nodes CSV path required for CSV mode")
                .clone();
            let edges = args
                .get(4)
                .expect("edges CSV path required for CSV mode")
                .clone();
            DataSource::Csv { nodes, edges }
        }
        _ => {
            eprintln!(
                "Usage: {} [profile] [grid | csv <nodes.csv> <edges.csv>]\n  - profile: a preset from Config.toml (e.g. walk, bike)\n  - grid: search a synthetic street grid\n  - csv: load a street network from node/edge CSV files",
                args[0]
            );
            std::process::exit(1);
        }
    };

    (profile, source)
}

async fn run(
    config: &config::Config,
    profile_name: &str,
    source: &DataSource,
) -> Result<Vec<Candidate>, Error> {
    let profile = config.profile(profile_name)?;
    let mode = profile.travel_mode()?;
    let params = profile.search_params();
    let metric = config::build_metric(&config.start.metric)?;

    let raw = load_graph(config, source).await?;
    let cleaned = clean_graph(&raw, mode, &profile.prune_params());
    println!(
        "Pruned graph: {} of {} nodes, {} of {} edges kept.",
        cleaned.num_nodes(),
        raw.num_nodes(),
        cleaned.num_edges(),
        raw.num_edges()
    );

    let anchor = (config.start.x, config.start.y);
    let start = nearest::nearest_node(&cleaned, anchor, &*metric).ok_or(Error::EmptyGraph)?;
    println!(
        "Starting from node {} (ext id {}).",
        start,
        cleaned.nodes()[start].ext_id
    );

    // Reject a bad preset before spawning anything.
    params.validate()?;

    println!(
        "Looking for ~{}m loops (±{}%), {} attempts across {} workers...",
        params.target_distance,
        (params.margin * 100.0).round(),
        params.attempts,
        config.runtime.workers
    );

    let graph = Arc::new(cleaned);
    let (sender, receiver) = mpsc::channel::<Candidate>(config.runtime.channel_capacity);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handles = workers::spawn_search_workers(
        graph,
        start,
        params.clone(),
        metric,
        config.runtime.workers.max(1),
        config.runtime.seed,
        sender,
        shutdown_rx.clone(),
    );
    let collector = LoopCollector::new(receiver, shutdown_rx, params.top_k);
    let collector_handle = tokio::spawn(collector.collect());

    for handle in worker_handles {
        handle.await??;
    }
    let results = collector_handle.await??;

    Ok(results)
}

async fn load_graph(config: &config::Config, source: &DataSource) -> Result<StreetGraph, Error> {
    match source {
        DataSource::Grid => {
            println!("Generating synthetic street grid...");
            SynthGraphSource::new(config.grid.clone()).load().await
        }
        DataSource::Csv { nodes, edges } => {
            println!("Loading street network from CSV...");
            CsvGraphSource::new(nodes.clone(), edges.clone()).load().await
        }
    }
}

fn report(results: &[Candidate]) {
    if results.is_empty() {
        println!("No valid loops found. Try a larger margin or more attempts.");
        return;
    }

    for (idx, candidate) in results.iter().enumerate() {
        println!(
            "Loop {}: length {:.0}m, steps {}, score {:.1}",
            idx + 1,
            candidate.distance,
            candidate.path.len() - 1,
            candidate.score
        );
        let ids: Vec<String> = candidate.path.iter().map(|n| n.to_string()).collect();
        println!("  path: {}", ids.join(" -> "));
    }
}
