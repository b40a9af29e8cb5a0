use common::types::NodeId;
use loop_router_core::{DistanceMetric, StreetGraph};

/// Nearest-node lookup: the caller-side collaborator that turns an anchor
/// coordinate into the start node. Linear scan under the active metric;
/// graphs at loop-search scale (a few thousand junctions) don't warrant an
/// index. Returns `None` on an empty graph.
pub fn nearest_node(
    graph: &StreetGraph,
    anchor: (f64, f64),
    metric: &dyn DistanceMetric,
) -> Option<NodeId> {
    (0..graph.num_nodes()).min_by(|&a, &b| {
        let da = metric.distance_m(graph.coords(a), anchor);
        let db = metric.distance_m(graph.coords(b), anchor);
        da.total_cmp(&db)
    })
}
