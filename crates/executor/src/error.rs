use thiserror::Error;

use common::error::Error as LoopRouterError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Unknown profile '{0}'. Define it under [profiles.{0}] in Config.toml.")]
    UnknownProfile(String),

    #[error("Unknown travel mode '{0}' (expected 'walk' or 'bike').")]
    UnknownMode(String),

    #[error("Unknown distance metric '{0}' (expected 'planar' or 'great_circle').")]
    UnknownMetric(String),

    #[error("Edge references unknown node id {0}.")]
    UnknownNodeId(u64),

    #[error("Graph is empty after pruning; nothing to start from.")]
    EmptyGraph,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Graph processing error: {0}")]
    GraphError(#[from] LoopRouterError),

    #[error("Worker task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
