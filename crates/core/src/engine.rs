use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use common::error::Error;
use common::types::{Candidate, LoopKey, NodeId, SearchParams};

use crate::graph::StreetGraph;
use crate::metric::DistanceMetric;
use crate::walk;

/// Derives the RNG seed of one attempt from a base seed.
///
/// SplitMix64-style multiply keeps consecutive attempt indices decorrelated,
/// so a search is reproducible from `(base, attempt index)` alone, whether
/// attempts run sequentially or are sharded across workers.
pub fn attempt_seed(base: u64, attempt: u64) -> u64 {
    base ^ attempt.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Deduplicating, score-ranked accumulator of finished candidates.
///
/// The only mutable structure shared between search attempts: the
/// sequential engine owns one directly, the parallel executor funnels
/// worker candidates into one through a channel.
#[derive(Debug)]
pub struct ResultCollector {
    top_k: usize,
    seen: HashSet<LoopKey>,
    retained: Vec<Candidate>,
}

impl ResultCollector {
    pub fn new(top_k: usize) -> Self {
        ResultCollector {
            top_k,
            seen: HashSet::new(),
            retained: Vec::new(),
        }
    }

    /// Retains `candidate` unless a loop with the same distinct-node set was
    /// already offered. Returns whether it was kept.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        if !self.seen.insert(candidate.loop_key()) {
            return false;
        }
        self.retained.push(candidate);
        true
    }

    /// Number of distinct loops retained so far.
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Final ranking: best `top_k` distinct loops, scores descending.
    pub fn into_ranked(mut self) -> Vec<Candidate> {
        self.retained
            .sort_by(|a, b| b.score.total_cmp(&a.score));
        self.retained.truncate(self.top_k);
        self.retained
    }
}

/// Orchestrates repeated randomized walk attempts over a cleaned graph and
/// keeps the best distinct loops.
pub struct LoopSearchEngine<M> {
    params: SearchParams,
    metric: M,
}

impl<M> LoopSearchEngine<M>
where
    M: DistanceMetric,
{
    pub fn new(params: SearchParams, metric: M) -> Self {
        LoopSearchEngine { params, metric }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Runs the configured number of attempts from `start`, seeded by
    /// `base_seed`, and returns up to `top_k` distinct loops ranked by
    /// score. An empty vec means no loop closed, an expected outcome rather than
    /// an error.
    ///
    /// # Errors
    /// Rejects an invalid parameter set or an out-of-range start node
    /// before any walk runs.
    pub fn search(
        &self,
        graph: &StreetGraph,
        start: NodeId,
        base_seed: u64,
    ) -> Result<Vec<Candidate>, Error> {
        let stop = AtomicBool::new(false);
        self.search_with_stop(graph, start, base_seed, &stop)
    }

    /// Like [`search`](Self::search), with a cooperative stop flag checked
    /// between attempts (never mid-walk; `max_steps` bounds each attempt).
    /// Loops found before the flag was raised are still returned.
    pub fn search_with_stop(
        &self,
        graph: &StreetGraph,
        start: NodeId,
        base_seed: u64,
        stop: &AtomicBool,
    ) -> Result<Vec<Candidate>, Error> {
        self.params.validate()?;
        if start >= graph.num_nodes() {
            return Err(Error::NodeIndexOutOfBounds(start));
        }

        let mut collector = ResultCollector::new(self.params.top_k);

        for attempt in 0..self.params.attempts {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            let mut rng = SmallRng::seed_from_u64(attempt_seed(base_seed, attempt as u64));
            if let Some(candidate) =
                walk::random_loop(graph, start, &self.params, &self.metric, &mut rng)
            {
                collector.offer(candidate);
            }
        }

        Ok(collector.into_ranked())
    }
}
