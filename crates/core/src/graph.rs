use common::error::Error;
use common::types::{EdgeId, GraphNode, NodeId, StreetEdge};

/// Street network in Compressed Sparse Row (CSR) adjacency format.
///
/// The graph is an undirected multigraph: every `StreetEdge` is stored once
/// in `edges`, and contributes a half-edge in each direction to the CSR
/// arrays (one half-edge for a self-loop):
/// - `node_pointers[u]..node_pointers[u+1]` → half-edges leaving node `u`
/// - `half_targets[i]` → neighbor reached by half-edge `i`
/// - `half_edges[i]` → index into `edges` of the segment traversed
///
/// Parallel edges between the same node pair stay distinct: each shows up
/// as its own (neighbor, edge) adjacency entry, which is exactly the view
/// the walk generator permutes at every step.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<StreetEdge>,
    node_pointers: Vec<usize>,
    half_targets: Vec<NodeId>,
    half_edges: Vec<EdgeId>,
}

impl StreetGraph {
    /// Builds a graph from node and edge lists.
    ///
    /// # Errors
    /// Returns `Error::InvalidGraph` if any edge references a node index
    /// outside `0..nodes.len()`, or carries a length that is negative or
    /// not finite. Isolated nodes are allowed here; pruning removes them.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<StreetEdge>) -> Result<Self, Error> {
        for edge in &edges {
            if edge.a >= nodes.len() || edge.b >= nodes.len() {
                return Err(Error::InvalidGraph);
            }
            if !edge.length.is_finite() || edge.length < 0.0 {
                return Err(Error::InvalidGraph);
            }
        }
        Ok(Self::assemble(nodes, edges))
    }

    /// Assembles the CSR arrays with the two-pass counting technique.
    /// Callers must have validated endpoints and lengths already.
    pub(crate) fn assemble(nodes: Vec<GraphNode>, edges: Vec<StreetEdge>) -> Self {
        let num_nodes = nodes.len();
        let mut node_pointers = vec![0usize; num_nodes + 1];

        for edge in &edges {
            node_pointers[edge.a + 1] += 1;
            if edge.b != edge.a {
                node_pointers[edge.b + 1] += 1;
            }
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let half_count = node_pointers[num_nodes];
        let mut half_targets = vec![0 as NodeId; half_count];
        let mut half_edges = vec![0 as EdgeId; half_count];

        let mut cursor = node_pointers.clone();
        for (edge_id, edge) in edges.iter().enumerate() {
            let pos = cursor[edge.a];
            half_targets[pos] = edge.b;
            half_edges[pos] = edge_id;
            cursor[edge.a] += 1;

            if edge.b != edge.a {
                let pos = cursor[edge.b];
                half_targets[pos] = edge.a;
                half_edges[pos] = edge_id;
                cursor[edge.b] += 1;
            }
        }

        StreetGraph {
            nodes,
            edges,
            node_pointers,
            half_targets,
            half_edges,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[StreetEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Coordinates of a node. Panics on an out-of-range index; the engine
    /// validates the start node before any walk touches the graph.
    pub fn coords(&self, id: NodeId) -> (f64, f64) {
        let node = &self.nodes[id];
        (node.x, node.y)
    }

    /// Number of adjacency entries at `id` (parallel edges each count once,
    /// a self-loop counts once).
    pub fn degree(&self, id: NodeId) -> usize {
        self.node_pointers[id + 1] - self.node_pointers[id]
    }

    /// Adjacency view of `id`: one `(neighbor, edge)` pair per incident
    /// half-edge, parallel edges included.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        let start = self.node_pointers[id];
        let end = self.node_pointers[id + 1];
        (start..end).map(move |i| (self.half_targets[i], self.half_edges[i]))
    }

    /// Length lookup for a half-edge's segment.
    ///
    /// Total over every `EdgeId` the adjacency view hands out; `None` only
    /// for an id that does not belong to this graph. The walk generator
    /// skips a neighbor rather than failing when this cannot resolve.
    pub fn edge_length(&self, edge: EdgeId) -> Option<f64> {
        self.edges.get(edge).map(|e| e.length)
    }

    /// First edge found between `u` and `v`, if the pair is adjacent.
    /// With parallel edges present, which one is returned is unspecified.
    pub fn edge_between(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        if u >= self.num_nodes() {
            return None;
        }
        self.neighbors(u)
            .find(|&(target, _)| target == v)
            .map(|(_, edge)| edge)
    }
}
