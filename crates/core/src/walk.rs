use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use common::types::{Candidate, EdgeId, EdgeKey, NodeId, SearchParams, edge_key};

use crate::graph::StreetGraph;
use crate::metric::DistanceMetric;
use crate::score::score_path;

/// One randomized loop-growth attempt.
///
/// Grows a path edge-by-edge from `start`, permuting the adjacency list at
/// every step and taking the first eligible entry. A neighbor is eligible
/// unless it would immediately backtrack over the node just left (waived
/// while the path has fewer than 2 nodes), it has already been visited
/// `revisit_cap` times, or its edge length cannot be resolved.
///
/// The attempt succeeds as soon as, after a step, the accumulated distance
/// falls inside the symmetric margin band around the target AND the walker
/// is within `proximity_m` of the start per `metric`. Getting stuck or
/// exhausting `max_steps` yields `None`; neither is an error.
///
/// Fully self-contained: reads the shared graph, mutates only local state,
/// and draws randomness exclusively from the injected `rng`, so attempts
/// can be seeded independently and run in parallel.
pub fn random_loop<M, R>(
    graph: &StreetGraph,
    start: NodeId,
    params: &SearchParams,
    metric: &M,
    rng: &mut R,
) -> Option<Candidate>
where
    M: DistanceMetric + ?Sized,
    R: Rng + ?Sized,
{
    let lower = (1.0 - params.margin) * params.target_distance;
    let upper = (1.0 + params.margin) * params.target_distance;
    let start_xy = graph.coords(start);

    let mut path: Vec<NodeId> = vec![start];
    let mut distance = 0.0f64;
    let mut current = start;
    let mut node_visits = vec![0u32; graph.num_nodes()];
    let mut edge_visits: HashMap<EdgeKey, u32> = HashMap::new();
    let mut candidates: Vec<(NodeId, EdgeId)> = Vec::new();

    for _ in 0..params.max_steps {
        candidates.clear();
        candidates.extend(graph.neighbors(current));
        candidates.shuffle(rng);

        let prev = if path.len() >= 2 {
            Some(path[path.len() - 2])
        } else {
            None
        };

        let mut moved = false;
        for &(neighbor, edge) in &candidates {
            if Some(neighbor) == prev {
                continue;
            }
            if node_visits[neighbor] >= params.revisit_cap {
                continue;
            }
            let Some(edge_len) = graph.edge_length(edge) else {
                continue;
            };

            path.push(neighbor);
            distance += edge_len;
            *edge_visits.entry(edge_key(current, neighbor)).or_insert(0) += 1;
            node_visits[neighbor] += 1;
            current = neighbor;
            moved = true;
            break;
        }

        if !moved {
            // Stuck: every neighbor filtered out (or none exist).
            return None;
        }

        if distance >= lower && distance <= upper {
            let here = graph.coords(current);
            if metric.distance_m(here, start_xy) < params.proximity_m {
                let score = score_path(
                    &path,
                    distance,
                    params.target_distance,
                    &edge_visits,
                    &params.weights,
                    params.subloop_window,
                );
                return Some(Candidate {
                    path,
                    distance,
                    score,
                });
            }
        }
    }

    None
}
