//! Workload configuration.

use quadtree::{Point, Rectangle, TreeConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Path used when no workload file is given on the command line.
pub const DEFAULT_PATH: &str = "qtree.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Range queries run after the workload.
    #[serde(default = "default_queries")]
    pub query: Vec<Rectangle>,
}

impl Config {
    /// Load the workload from `path`. A missing default file is created
    /// with the default workload; any other missing path is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else if path == Path::new(DEFAULT_PATH) {
            info!("No {} found, creating default workload", DEFAULT_PATH);
            let default_config = Self {
                query: default_queries(),
                ..Self::default()
            };
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        } else {
            anyhow::bail!("workload file {} does not exist", path.display())
        }
    }
}

/// Points to insert and remove.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkloadConfig {
    /// Explicit points, inserted first.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Number of uniformly random points inserted after the explicit ones.
    #[serde(default = "default_random_points")]
    pub random_points: usize,
    /// Seed for the random points.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Points removed once all insertions are done.
    #[serde(default)]
    pub remove: Vec<Point>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            random_points: default_random_points(),
            seed: default_seed(),
            remove: Vec::new(),
        }
    }
}

fn default_random_points() -> usize {
    1000
}
fn default_seed() -> u64 {
    42
}
fn default_queries() -> Vec<Rectangle> {
    vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]
}
