pub mod engine;
pub mod graph;
pub mod metric;
pub mod prune;
pub mod score;
pub mod walk;

pub use engine::{LoopSearchEngine, ResultCollector, attempt_seed};
pub use graph::StreetGraph;
pub use metric::{DistanceMetric, GreatCircle, Planar};
