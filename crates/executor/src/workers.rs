use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::{mpsc::Sender, watch};
use tokio::task::JoinHandle;

use common::types::{Candidate, NodeId, SearchParams};
use loop_router_core::{StreetGraph, attempt_seed, walk};

use super::error::Error;
use super::types::SharedMetric;

/// Spawns `workers` search tasks sharing the attempt budget.
///
/// Worker `w` handles attempts `w, w+workers, w+2*workers, ...`, each with
/// an RNG derived from `(base_seed, attempt index)`, the same schedule the
/// sequential engine uses, so a parallel run finds the same candidate set
/// as a sequential one with the same seed, just in a different arrival
/// order. Workers only read the shared graph; every successful candidate
/// is pushed to the collector channel. The shutdown signal is honored
/// between attempts, never mid-walk.
pub fn spawn_search_workers(
    graph: Arc<StreetGraph>,
    start: NodeId,
    params: SearchParams,
    metric: SharedMetric,
    workers: usize,
    base_seed: u64,
    sender: Sender<Candidate>,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<Result<(), Error>>> {
    (0..workers)
        .map(|worker_idx| {
            let graph = graph.clone();
            let params = params.clone();
            let metric = metric.clone();
            let sender = sender.clone();
            let shutdown = shutdown.clone();

            tokio::spawn(async move {
                let mut attempt = worker_idx;
                while attempt < params.attempts {
                    if *shutdown.borrow() {
                        break;
                    }

                    let mut rng =
                        SmallRng::seed_from_u64(attempt_seed(base_seed, attempt as u64));
                    if let Some(candidate) =
                        walk::random_loop(&graph, start, &params, &*metric, &mut rng)
                    {
                        if sender.send(candidate).await.is_err() {
                            return Err(Error::ChannelSendFailed);
                        }
                    }

                    attempt += workers;
                }
                Ok(())
            })
        })
        .collect()
}
