//! TOML configuration file.
//!
//! Every field is optional; missing values fall back to the defaults.
//!
//! ```toml
//! [search]
//! max_depth = 3
//! cache_enabled = true
//!
//! [heuristic]
//! empty_weight = 2.7
//! smoothness_weight = 0.1
//! monotonicity_weight = 1.0
//! max_tile_weight = 1.0
//!
//! [simulation]
//! runs = 20
//! move_limit = 1000
//! seed = 42
//! parallel = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::expectimax::{ExpectimaxConfig, HeuristicWeights, SearchError};
use crate::sim::SimOptions;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub search: ExpectimaxConfig,
    pub heuristic: HeuristicWeights,
    pub simulation: SimOptions,
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        contents.parse()
    }

    /// Search settings with the `[heuristic]` weights folded in.
    pub fn search_config(&self) -> ExpectimaxConfig {
        ExpectimaxConfig { weights: self.heuristic, ..self.search.clone() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search_config().validate()?;
        let w = &self.heuristic;
        let weights = [
            ("empty_weight", w.empty_weight),
            ("smoothness_weight", w.smoothness_weight),
            ("monotonicity_weight", w.monotonicity_weight),
            ("max_tile_weight", w.max_tile_weight),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        if self.simulation.runs == 0 {
            return Err(ConfigError::Invalid("simulation.runs must be at least 1".into()));
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
