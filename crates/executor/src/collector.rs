use tokio::select;
use tokio::sync::{mpsc::Receiver, watch};

use common::types::Candidate;
use loop_router_core::ResultCollector;

use super::error::Error;

/// Async consumer that funnels worker candidates into the shared
/// deduplicating accumulator.
///
/// This is the single owner of the only mutable search state (the seen-set
/// and the retained candidates), so the workers need no lock; they just
/// send finished candidates over the channel.
pub struct LoopCollector {
    receiver: Receiver<Candidate>,
    shutdown: watch::Receiver<bool>,
    collector: ResultCollector,
}

impl LoopCollector {
    pub fn new(
        receiver: Receiver<Candidate>,
        shutdown: watch::Receiver<bool>,
        top_k: usize,
    ) -> Self {
        Self {
            receiver,
            shutdown,
            collector: ResultCollector::new(top_k),
        }
    }

    /// Run the collector until every worker sender is gone (or shutdown is
    /// signaled), then return the ranked top-k distinct loops. Candidates
    /// already accepted before shutdown are kept.
    pub async fn collect(mut self) -> Result<Vec<Candidate>, Error> {
        loop {
            select! {
                candidate = self.receiver.recv() => {
                    match candidate {
                        Some(candidate) => {
                            self.collector.offer(candidate);
                        }
                        None => break,
                    }
                }

                changed = self.shutdown.changed() => {
                    // A closed shutdown channel means the orchestrator is
                    // gone; stop either way.
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        Ok(self.collector.into_ranked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn candidate(path: Vec<usize>, score: f64) -> Candidate {
        Candidate {
            path,
            distance: 500.0,
            score,
        }
    }

    #[tokio::test]
    async fn collects_ranks_and_dedups() {
        let (tx, rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let collector = LoopCollector::new(rx, stop_rx, 2);

        let feeder = tokio::spawn(async move {
            tx.send(candidate(vec![0, 1, 2, 0], 5.0)).await.unwrap();
            // Same loop shape traversed backwards: must be dropped.
            tx.send(candidate(vec![0, 2, 1, 0], 50.0)).await.unwrap();
            tx.send(candidate(vec![0, 3, 4, 0], 30.0)).await.unwrap();
            tx.send(candidate(vec![0, 5, 6, 7, 0], 1.0)).await.unwrap();
        });

        let results = collector.collect().await.unwrap();
        feeder.await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, 30.0);
        assert_eq!(results[1].score, 5.0);
    }

    #[tokio::test]
    async fn empty_channel_yields_empty_results() {
        let (tx, rx) = mpsc::channel::<Candidate>(1);
        let (_stop_tx, stop_rx) = watch::channel(false);
        drop(tx);

        let results = LoopCollector::new(rx, stop_rx, 3).collect().await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn full_pipeline_finds_the_ring_loop() {
        use crate::workers::spawn_search_workers;
        use common::types::{GraphNode, SearchParams, StreetEdge};
        use loop_router_core::{Planar, StreetGraph};
        use std::sync::Arc;

        let nodes: Vec<GraphNode> = (0..6)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / 6.0;
                GraphNode {
                    ext_id: i as u64,
                    x: 100.0 * angle.cos(),
                    y: 100.0 * angle.sin(),
                }
            })
            .collect();
        let edges: Vec<StreetEdge> = (0..6)
            .map(|i| StreetEdge {
                a: i,
                b: (i + 1) % 6,
                length: 100.0,
                categories: Vec::new(),
            })
            .collect();
        let graph = Arc::new(StreetGraph::from_parts(nodes, edges).unwrap());

        let mut params = SearchParams::for_target(600.0);
        params.margin = 0.1;
        params.max_steps = 20;
        params.attempts = 12;
        params.proximity_m = 50.0;

        let (tx, rx) = mpsc::channel(16);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handles = spawn_search_workers(
            graph,
            0,
            params.clone(),
            Arc::new(Planar),
            3,
            77,
            tx,
            stop_rx.clone(),
        );
        let collector = LoopCollector::new(rx, stop_rx, params.top_k);
        let collector_handle = tokio::spawn(collector.collect());

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let results = collector_handle.await.unwrap().unwrap();

        // Both ring directions share one distinct-node set.
        assert_eq!(results.len(), 1);
        assert!((results[0].distance - 600.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn shutdown_signal_stops_collection() {
        let (tx, rx) = mpsc::channel(8);
        let (stop_tx, stop_rx) = watch::channel(false);
        let collector = LoopCollector::new(rx, stop_rx, 3);

        let handle = tokio::spawn(collector.collect());
        stop_tx.send(true).unwrap();

        let results = handle.await.unwrap().unwrap();
        assert!(results.is_empty());
        drop(tx);
    }
}
