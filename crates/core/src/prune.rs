use common::types::{GraphNode, NodeId, PruneParams, StreetEdge, TravelMode};

use crate::graph::StreetGraph;

/// Produces a cleaned copy of `graph` suitable for loop generation.
///
/// - Drops every edge shorter than `params.min_edge_length` (spurious
///   micro-segments inflate step counts without adding distance).
/// - In `TravelMode::Walk`, drops edges carrying any excluded category tag
///   (stairs, platforms, service ways and the like).
/// - Drops nodes left without incident edges; downstream neighbor lookups
///   assume every retained node has at least one usable neighbor.
///
/// Pure and deterministic; the input graph is never mutated. Node indices
/// are compacted, external ids and coordinates are preserved. Idempotent:
/// cleaning an already-cleaned graph returns an equal graph.
pub fn clean_graph(graph: &StreetGraph, mode: TravelMode, params: &PruneParams) -> StreetGraph {
    let kept_edges: Vec<&StreetEdge> = graph
        .edges()
        .iter()
        .filter(|edge| edge.length >= params.min_edge_length)
        .filter(|edge| match mode {
            TravelMode::Walk => !edge
                .categories
                .iter()
                .any(|tag| params.excluded_categories.contains(tag)),
            TravelMode::Bike => true,
        })
        .collect();

    // Compact node indices: keep only endpoints of surviving edges.
    let mut keep = vec![false; graph.num_nodes()];
    for edge in &kept_edges {
        keep[edge.a] = true;
        keep[edge.b] = true;
    }

    let mut remap: Vec<NodeId> = vec![usize::MAX; graph.num_nodes()];
    let mut nodes: Vec<GraphNode> = Vec::new();
    for (old, node) in graph.nodes().iter().enumerate() {
        if keep[old] {
            remap[old] = nodes.len();
            nodes.push(node.clone());
        }
    }

    let edges: Vec<StreetEdge> = kept_edges
        .into_iter()
        .map(|edge| StreetEdge {
            a: remap[edge.a],
            b: remap[edge.b],
            length: edge.length,
            categories: edge.categories.clone(),
        })
        .collect();

    // Endpoints were remapped into range and lengths already validated by
    // the source graph, so assembly cannot fail.
    StreetGraph::assemble(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn node(ext_id: u64) -> GraphNode {
        GraphNode {
            ext_id,
            x: ext_id as f64,
            y: 0.0,
        }
    }

    fn edge(a: NodeId, b: NodeId, length: f64, tags: &[&str]) -> StreetEdge {
        StreetEdge {
            a,
            b,
            length,
            categories: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn params(min_len: f64, excluded: &[&str]) -> PruneParams {
        PruneParams {
            min_edge_length: min_len,
            excluded_categories: excluded.iter().map(|t| t.to_string()).collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn short_edges_are_dropped_in_any_mode() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2), node(3)],
            vec![edge(0, 1, 2.0, &[]), edge(1, 2, 80.0, &[])],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Bike, &params(5.0, &["steps"]));
        assert_eq!(cleaned.num_edges(), 1);
        assert_eq!(cleaned.edges()[0].length, 80.0);
    }

    #[test]
    fn walk_mode_drops_excluded_categories() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2), node(3)],
            vec![
                edge(0, 1, 50.0, &["steps"]),
                edge(1, 2, 50.0, &["residential"]),
            ],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Walk, &params(5.0, &["steps"]));
        assert_eq!(cleaned.num_edges(), 1);
        assert_eq!(cleaned.edges()[0].categories, vec!["residential"]);
    }

    #[test]
    fn bike_mode_keeps_excluded_categories() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2)],
            vec![edge(0, 1, 50.0, &["steps"])],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Bike, &params(5.0, &["steps"]));
        assert_eq!(cleaned.num_edges(), 1);
    }

    #[test]
    fn any_matching_tag_disqualifies_a_multi_tag_edge() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2)],
            vec![edge(0, 1, 50.0, &["footway", "steps"])],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Walk, &params(5.0, &["steps"]));
        assert_eq!(cleaned.num_edges(), 0);
        assert_eq!(cleaned.num_nodes(), 0);
    }

    #[test]
    fn untagged_edges_survive_walk_mode() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2)],
            vec![edge(0, 1, 50.0, &[])],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Walk, &params(5.0, &["steps"]));
        assert_eq!(cleaned.num_edges(), 1);
    }

    #[test]
    fn isolated_nodes_are_removed_and_indices_compacted() {
        // Node 1 only connects through a too-short edge; node 3 starts isolated.
        let g = StreetGraph::from_parts(
            vec![node(10), node(11), node(12), node(13)],
            vec![edge(0, 1, 2.0, &[]), edge(0, 2, 60.0, &[])],
        )
        .unwrap();

        let cleaned = clean_graph(&g, TravelMode::Walk, &params(5.0, &[]));
        assert_eq!(cleaned.num_nodes(), 2);

        let ext_ids: Vec<u64> = cleaned.nodes().iter().map(|n| n.ext_id).collect();
        assert_eq!(ext_ids, vec![10, 12]);

        // Every retained node has a usable neighbor.
        for id in 0..cleaned.num_nodes() {
            assert!(cleaned.degree(id) > 0);
        }
    }

    #[test]
    fn cleaning_is_idempotent() {
        let g = StreetGraph::from_parts(
            vec![node(1), node(2), node(3), node(4)],
            vec![
                edge(0, 1, 2.0, &[]),
                edge(1, 2, 50.0, &["steps"]),
                edge(2, 3, 75.0, &["residential"]),
                edge(3, 1, 90.0, &[]),
            ],
        )
        .unwrap();

        let p = params(5.0, &["steps"]);
        let once = clean_graph(&g, TravelMode::Walk, &p);
        let twice = clean_graph(&once, TravelMode::Walk, &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_of_empty_graph_is_empty() {
        let g = StreetGraph::from_parts(Vec::new(), Vec::new()).unwrap();
        let cleaned = clean_graph(&g, TravelMode::Walk, &PruneParams::default());
        assert_eq!(cleaned.num_nodes(), 0);
        assert_eq!(cleaned.num_edges(), 0);
    }
}
