use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use common::types::{GraphNode, NodeId, StreetEdge};
use loop_router_core::StreetGraph;

use super::config::GridConfig;
use super::error::Error;
use super::types::GraphSource;

/// Category mix for generated blocks: mostly ordinary streets, with some
/// pedestrian-only paths and the occasional staircase so walk-mode pruning
/// has something to chew on.
const CATEGORY_POOL: [&str; 6] = [
    "residential",
    "residential",
    "residential",
    "tertiary",
    "footway",
    "steps",
];

/// Produces a synthetic street network for demos and tests: a
/// `width x height` grid of junctions in projected planar meters, each
/// displaced by up to `jitter_m`, connected by horizontal and vertical
/// block edges whose length is the jittered Euclidean distance.
///
/// Deterministic for a given `GridConfig` (including its seed).
pub struct SynthGraphSource {
    config: GridConfig,
}

impl SynthGraphSource {
    pub fn new(config: GridConfig) -> Self {
        SynthGraphSource { config }
    }

    fn generate(&self) -> Result<StreetGraph, Error> {
        let cfg = &self.config;
        let mut rng: SmallRng = SmallRng::seed_from_u64(cfg.seed);

        let mut nodes: Vec<GraphNode> = Vec::with_capacity(cfg.width * cfg.height);
        for row in 0..cfg.height {
            for col in 0..cfg.width {
                let dx = rng.random_range(-cfg.jitter_m..=cfg.jitter_m);
                let dy = rng.random_range(-cfg.jitter_m..=cfg.jitter_m);
                nodes.push(GraphNode {
                    ext_id: (row * cfg.width + col) as u64,
                    x: col as f64 * cfg.spacing_m + dx,
                    y: row as f64 * cfg.spacing_m + dy,
                });
            }
        }

        let index = |row: usize, col: usize| -> NodeId { row * cfg.width + col };
        let mut edges: Vec<StreetEdge> = Vec::new();

        for row in 0..cfg.height {
            for col in 0..cfg.width {
                let here = index(row, col);
                if col + 1 < cfg.width {
                    edges.push(self.block_edge(&nodes, here, index(row, col + 1), &mut rng));
                }
                if row + 1 < cfg.height {
                    edges.push(self.block_edge(&nodes, here, index(row + 1, col), &mut rng));
                }
            }
        }

        Ok(StreetGraph::from_parts(nodes, edges)?)
    }

    fn block_edge(
        &self,
        nodes: &[GraphNode],
        a: NodeId,
        b: NodeId,
        rng: &mut SmallRng,
    ) -> StreetEdge {
        let dx = nodes[a].x - nodes[b].x;
        let dy = nodes[a].y - nodes[b].y;
        let category = CATEGORY_POOL[rng.random_range(0..CATEGORY_POOL.len())];
        StreetEdge {
            a,
            b,
            length: (dx * dx + dy * dy).sqrt(),
            categories: vec![category.to_string()],
        }
    }
}

#[async_trait]
impl GraphSource for SynthGraphSource {
    async fn load(&self) -> Result<StreetGraph, Error> {
        let graph = self.generate()?;
        println!(
            "SynthGraphSource: generated {} nodes, {} edges ({}x{} grid).",
            graph.num_nodes(),
            graph.num_edges(),
            self.config.width,
            self.config.height
        );
        Ok(graph)
    }
}
