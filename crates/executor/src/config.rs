use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use common::types::{PruneParams, ScoreWeights, SearchParams, TravelMode};
use loop_router_core::{GreatCircle, Planar};

use super::error::Error;
use super::types::SharedMetric;

#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    pub workers: usize,
    pub channel_capacity: usize,
    pub seed: u64,
}

/// Where the search is anchored: the nearest graph node to this coordinate
/// becomes the start node. `metric` names the distance collaborator and
/// must match the coordinate system of the graph ("planar" for projected
/// meters, "great_circle" for lon/lat degrees).
#[derive(Debug, Deserialize, Clone)]
pub struct StartConfig {
    pub x: f64,
    pub y: f64,
    pub metric: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub spacing_m: f64,
    pub jitter_m: f64,
    pub seed: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeightsConfig {
    pub unique: f64,
    pub repeat: f64,
    pub subloop: f64,
    pub edge_repeat: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PruningConfig {
    pub min_edge_length: f64,
    pub excluded_categories: Vec<String>,
}

/// One complete search preset. The walk and bike variants are just two of
/// these with different constants; there is a single engine code path.
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    pub mode: String,
    pub target_distance: f64,
    pub margin: f64,
    pub max_steps: usize,
    pub attempts: usize,
    pub top_k: usize,
    pub revisit_cap: u32,
    pub proximity_m: f64,
    pub subloop_window: usize,
    pub weights: WeightsConfig,
    pub pruning: PruningConfig,
}

impl ProfileConfig {
    pub fn travel_mode(&self) -> Result<TravelMode, Error> {
        match self.mode.as_str() {
            "walk" => Ok(TravelMode::Walk),
            "bike" => Ok(TravelMode::Bike),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            target_distance: self.target_distance,
            margin: self.margin,
            max_steps: self.max_steps,
            attempts: self.attempts,
            top_k: self.top_k,
            revisit_cap: self.revisit_cap,
            proximity_m: self.proximity_m,
            subloop_window: self.subloop_window,
            weights: ScoreWeights {
                unique: self.weights.unique,
                repeat: self.weights.repeat,
                subloop: self.weights.subloop,
                edge_repeat: self.weights.edge_repeat,
            },
        }
    }

    pub fn prune_params(&self) -> PruneParams {
        PruneParams {
            min_edge_length: self.pruning.min_edge_length,
            excluded_categories: self.pruning.excluded_categories.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub start: StartConfig,
    pub grid: GridConfig,
    pub profiles: HashMap<String, ProfileConfig>,
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&ProfileConfig, Error> {
        self.profiles
            .get(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }
}

/// Resolves the configured metric name into the distance collaborator.
pub fn build_metric(name: &str) -> Result<SharedMetric, Error> {
    match name {
        "planar" => Ok(Arc::new(Planar)),
        "great_circle" => Ok(Arc::new(GreatCircle)),
        other => Err(Error::UnknownMetric(other.to_string())),
    }
}

/// Loads configuration from a file and environment variables.
pub fn load_config() -> Result<Config, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    let config_file_path: PathBuf = base_path
        .join("crates")
        .join("executor")
        .join("Config.toml");

    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("LOOPROUTER")
                .try_parsing(true)
                .separator("_"),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    Ok(app_config)
}
