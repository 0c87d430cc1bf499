//! Search tuning, loadable from JSON.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mcts: MctsConfig,
    pub expectiminimax: ExpectiminimaxConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCB1 exploration weight.
    pub exploration_constant: f32,
    /// Iterations run between clock checks.
    pub batch_size: usize,
    /// The search stops once the root has been visited this many times.
    pub max_root_visits: u64,
    /// Fixed seed for branch sampling; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Independent root searches merged at the end.
    pub threads: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f32::consts::SQRT_2,
            batch_size: 100,
            max_root_visits: 10_000_000,
            seed: None,
            threads: 1,
        }
    }
}

impl MctsConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_exploration_constant(mut self, c: f32) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_max_root_visits(mut self, visits: u64) -> Self {
        self.max_root_visits = visits;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.exploration_constant.is_finite() && self.exploration_constant >= 0.0) {
            anyhow::bail!(
                "exploration_constant must be finite and >= 0, got {}",
                self.exploration_constant
            );
        }
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be > 0");
        }
        if self.max_root_visits == 0 {
            anyhow::bail!("max_root_visits must be > 0");
        }
        if self.threads == 0 {
            anyhow::bail!("threads must be > 0");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectiminimaxConfig {
    /// Skip the rest of a row once it cannot beat the best row so far.
    pub ab_prune: bool,
    /// Stop deepening here even with time left.
    pub max_depth: Option<u8>,
}

impl Default for ExpectiminimaxConfig {
    fn default() -> Self {
        Self {
            ab_prune: true,
            max_depth: None,
        }
    }
}

impl ExpectiminimaxConfig {
    pub fn with_ab_prune(mut self, ab_prune: bool) -> Self {
        self.ab_prune = ab_prune;
        self
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_depth == Some(0) {
            anyhow::bail!("max_depth must be >= 1 when set");
        }
        Ok(())
    }
}

impl SearchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.mcts.validate().context("invalid mcts config")?;
        self.expectiminimax
            .validate()
            .context("invalid expectiminimax config")?;
        Ok(())
    }
}

/// Reads a [`SearchConfig`] from a JSON file. Missing fields keep their
/// defaults.
pub fn load_config(path: &Path) -> anyhow::Result<SearchConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: SearchConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    config.validate()?;
    debug!(path = %path.display(), "loaded search config");
    Ok(config)
}

/// Like [`load_config`] but falls back to defaults when `path` is absent.
pub fn load_config_or_default(path: Option<&Path>) -> anyhow::Result<SearchConfig> {
    match path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(SearchConfig::default())
        }
        None => Ok(SearchConfig::default()),
    }
}
