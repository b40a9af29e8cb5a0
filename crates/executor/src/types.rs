use std::sync::Arc;

use tokio::task::JoinHandle;

use loop_router_core::{DistanceMetric, StreetGraph};

use super::error::Error;

pub type JoinHandleResult = JoinHandle<Result<(), Error>>;

/// Distance collaborator shared by the closing condition, the nearest-node
/// pick and any worker task.
pub type SharedMetric = Arc<dyn DistanceMetric>;

/// Where the street network comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Synthetic jittered grid, good for demos and benchmarks.
    Grid,
    /// Node and edge CSV files exported from a real network.
    Csv { nodes: String, edges: String },
}

/// A trait defining the contract for any collaborator that can supply a raw
/// street graph, already annotated with coordinates, lengths and category
/// tags.
///
/// This decouples the pipeline from the acquisition mechanism (synthetic
/// generation vs. file ingest vs. a future network download).
///
/// The trait bounds (`Send`, `Sync`, `'static`) are mandatory to ensure the
/// implementation can be safely executed by the multi-threaded asynchronous
/// runtime (Tokio).
#[async_trait::async_trait]
pub trait GraphSource: Send + Sync + 'static {
    async fn load(&self) -> Result<StreetGraph, Error>;
}
