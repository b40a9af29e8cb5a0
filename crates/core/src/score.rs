use std::collections::HashMap;

use common::types::{EdgeKey, NodeId, ScoreWeights};

/// Quality heuristic for a finished loop; higher is better.
///
/// Summed terms:
/// - `-|distance - target|`: symmetric penalty for missing the requested length;
/// - `+ distinct_nodes * unique`: reward for covering new territory;
/// - `- repeated_node_occurrences * repeat`: penalty for revisits;
/// - `- subloops * subloop`: penalty for a node reappearing within
///   `subloop_window` steps of its previous occurrence (tight tangles);
/// - `- repeated_edges * edge_repeat`: penalty per street segment traversed
///   more than once, counted by unordered endpoint pair.
///
/// Pure and deterministic given its inputs.
pub fn score_path(
    path: &[NodeId],
    distance: f64,
    target_distance: f64,
    edge_visits: &HashMap<EdgeKey, u32>,
    weights: &ScoreWeights,
    subloop_window: usize,
) -> f64 {
    let mut last_seen: HashMap<NodeId, usize> = HashMap::new();
    let mut subloops = 0usize;
    for (i, &node) in path.iter().enumerate() {
        if let Some(&prev) = last_seen.get(&node) {
            if i - prev < subloop_window {
                subloops += 1;
            }
        }
        last_seen.insert(node, i);
    }

    let unique_nodes = last_seen.len();
    let repeated_nodes = path.len() - unique_nodes;
    let repeated_edges = edge_visits.values().filter(|&&count| count > 1).count();

    -(distance - target_distance).abs()
        + unique_nodes as f64 * weights.unique
        - repeated_nodes as f64 * weights.repeat
        - subloops as f64 * weights.subloop
        - repeated_edges as f64 * weights.edge_repeat
}
