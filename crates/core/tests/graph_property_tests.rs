use proptest::prelude::*;
use proptest::strategy::Strategy;

use common::types::{GraphNode, NodeId, StreetEdge};
use loop_router_core::StreetGraph;

const NUM_NODES_STRATEGY: std::ops::Range<usize> = 1usize..12;

fn graph_strategy() -> impl Strategy<Value = (Vec<GraphNode>, Vec<StreetEdge>)> {
    NUM_NODES_STRATEGY.prop_flat_map(|num_nodes| {
        let node_generator = (0.0f64..1000.0, 0.0f64..1000.0)
            .prop_map(|(x, y)| GraphNode { ext_id: 0, x, y });
        let nodes_generator = prop::collection::vec(node_generator, num_nodes);

        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, 1.0f64..300.0).prop_map(
            |(a, b, length)| StreetEdge {
                a,
                b,
                length,
                categories: Vec::new(),
            },
        );
        let edges_generator = prop::collection::vec(edge_generator, 0..40);

        (nodes_generator, edges_generator)
    })
}

proptest! {
    /// Property: adjacency is symmetric: every (u -> v) entry has a
    /// matching (v -> u) entry referring to the same edge record.
    #[test]
    fn adjacency_is_symmetric((nodes, edges) in graph_strategy()) {
        let g = StreetGraph::from_parts(nodes, edges).unwrap();
        for u in 0..g.num_nodes() {
            for (v, e) in g.neighbors(u) {
                let mirrored = g
                    .neighbors(v)
                    .filter(|&(back, back_e)| back == u && back_e == e)
                    .count();
                prop_assert!(mirrored >= 1);
            }
        }
    }

    /// Property: degree sum equals the number of stored half-edges, which
    /// is two per ordinary edge and one per self-loop.
    #[test]
    fn degree_sum_matches_edge_count((nodes, edges) in graph_strategy()) {
        let self_loops = edges.iter().filter(|e| e.a == e.b).count();
        let expected = 2 * (edges.len() - self_loops) + self_loops;

        let g = StreetGraph::from_parts(nodes, edges).unwrap();
        let degree_sum: usize = (0..g.num_nodes()).map(|n| g.degree(n)).sum();
        prop_assert_eq!(degree_sum, expected);
    }

    /// Property: every edge id handed out by the adjacency view resolves
    /// to a defined, non-negative length.
    #[test]
    fn adjacency_edge_ids_always_resolve((nodes, edges) in graph_strategy()) {
        let g = StreetGraph::from_parts(nodes, edges).unwrap();
        for u in 0..g.num_nodes() {
            for (_, e) in g.neighbors(u) {
                let length = g.edge_length(e);
                prop_assert!(length.is_some());
                prop_assert!(length.unwrap() >= 0.0);
            }
        }
    }

    /// Property: edge_between agrees with the adjacency view.
    #[test]
    fn edge_between_consistent_with_neighbors((nodes, edges) in graph_strategy()) {
        let g = StreetGraph::from_parts(nodes, edges).unwrap();
        for u in 0..g.num_nodes() {
            let adjacent: Vec<NodeId> = g.neighbors(u).map(|(v, _)| v).collect();
            for v in 0..g.num_nodes() {
                match g.edge_between(u, v) {
                    Some(e) => {
                        prop_assert!(adjacent.contains(&v));
                        prop_assert!(g.edge_length(e).is_some());
                    }
                    None => prop_assert!(!adjacent.contains(&v)),
                }
            }
        }
    }
}
