use std::collections::HashSet;

use crate::error::Error;

/// Dense node index into a `StreetGraph` (0..num_nodes).
pub type NodeId = usize;

/// Index of an undirected edge record within its graph.
pub type EdgeId = usize;

/// Identity of a street segment independent of traversal direction:
/// the unordered endpoint pair, smaller index first.
pub type EdgeKey = (NodeId, NodeId);

/// Deduplication identity of a loop: the sorted set of distinct nodes it
/// visits. Two loops with the same key are the same shape regardless of
/// traversal order or edge repetitions.
pub type LoopKey = Vec<NodeId>;

/// Normalizes an endpoint pair into its direction-independent `EdgeKey`.
pub fn edge_key(a: NodeId, b: NodeId) -> EdgeKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// A street-network junction.
///
/// `ext_id` is the identifier assigned by whatever supplied the graph
/// (e.g. an OSM node id); `x`/`y` are its coordinates, either projected
/// meters or lon/lat degrees depending on the distance metric in use.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub ext_id: u64,
    pub x: f64,
    pub y: f64,
}

/// An undirected street segment between two junctions.
///
/// Parallel edges between the same pair are distinct records, each with its
/// own length. `categories` holds zero or more classification tags (a way
/// may carry several, e.g. `["footway", "steps"]`).
#[derive(Debug, Clone, PartialEq)]
pub struct StreetEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub length: f64,
    pub categories: Vec<String>,
}

/// Travel mode a route is generated for. Only affects graph pruning:
/// pedestrian mode additionally drops category-excluded edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Walk,
    Bike,
}

/// Weights of the four path-quality penalty/reward terms. Each is tunable
/// independently; defaults match the reference tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Reward per distinct node visited.
    pub unique: f64,
    /// Penalty per repeated node occurrence.
    pub repeat: f64,
    /// Penalty per short-range subloop (node reappearing within the window).
    pub subloop: f64,
    /// Penalty per street segment traversed more than once.
    pub edge_repeat: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            unique: 10.0,
            repeat: 40.0,
            subloop: 30.0,
            edge_repeat: 20.0,
        }
    }
}

/// Full tunable surface of one loop search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Requested loop length in meters.
    pub target_distance: f64,
    /// Fractional tolerance band around the target: a loop closes when its
    /// length lies within `[(1-margin)*target, (1+margin)*target]`.
    pub margin: f64,
    /// Hard bound on edge traversals per attempt.
    pub max_steps: usize,
    /// Number of independent randomized attempts per search.
    pub attempts: usize,
    /// Number of distinct loops retained.
    pub top_k: usize,
    /// Per-node visit cap within one attempt.
    pub revisit_cap: u32,
    /// A loop may only close while the walker is within this straight-line
    /// distance (meters) of the start node.
    pub proximity_m: f64,
    /// Step window for short-subloop detection during scoring.
    pub subloop_window: usize,
    pub weights: ScoreWeights,
}

impl SearchParams {
    /// Sensible defaults for a loop of `target_distance` meters.
    pub fn for_target(target_distance: f64) -> Self {
        SearchParams {
            target_distance,
            margin: 0.05,
            max_steps: 200,
            attempts: 1000,
            top_k: 3,
            revisit_cap: 3,
            proximity_m: 100.0,
            subloop_window: 30,
            weights: ScoreWeights::default(),
        }
    }

    /// Eager validation; rejects a configuration before any attempt runs.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.target_distance > 0.0) {
            return Err(Error::InvalidParameter("target_distance must be > 0"));
        }
        if !(self.margin >= 0.0 && self.margin < 1.0) {
            return Err(Error::InvalidParameter("margin must be in [0, 1)"));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidParameter("max_steps must be > 0"));
        }
        if self.attempts == 0 {
            return Err(Error::InvalidParameter("attempts must be > 0"));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidParameter("top_k must be > 0"));
        }
        if self.revisit_cap == 0 {
            return Err(Error::InvalidParameter("revisit_cap must be > 0"));
        }
        if !(self.proximity_m > 0.0) {
            return Err(Error::InvalidParameter("proximity_m must be > 0"));
        }
        Ok(())
    }
}

/// Edge-pruning thresholds applied before any search.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneParams {
    /// Edges shorter than this (meters) are dropped as noise.
    pub min_edge_length: f64,
    /// Category tags that disqualify an edge in pedestrian mode.
    pub excluded_categories: HashSet<String>,
}

impl Default for PruneParams {
    fn default() -> Self {
        let excluded = [
            "steps",
            "corridor",
            "escalator",
            "elevator",
            "platform",
            "raceway",
            "proposed",
            "construction",
            "service",
        ];
        PruneParams {
            min_edge_length: 5.0,
            excluded_categories: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One closed loop produced by a successful walk attempt.
///
/// Fields:
/// - `path`: visited node sequence, starting at the start node and ending
///   within the proximity threshold of it.
/// - `distance`: accumulated real-world length in meters.
/// - `score`: quality heuristic, higher is better.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub path: Vec<NodeId>,
    pub distance: f64,
    pub score: f64,
}

impl Candidate {
    /// The loop's deduplication key: sorted distinct visited nodes.
    pub fn loop_key(&self) -> LoopKey {
        let mut key = self.path.clone();
        key.sort_unstable();
        key.dedup();
        key
    }
}
