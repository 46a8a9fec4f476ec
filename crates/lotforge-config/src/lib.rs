//! Configuration system for LotForge.
//!
//! Selects which constructive, alpha policy, local search order and algorithm
//! shape the solver assembles, plus the random seed and the time or step
//! budget. Configuration loads from TOML or YAML; unknown variants fail at
//! parse time, before any solution exists.
//!
//! # Examples
//!
//! ```
//! use lotforge_config::{AlgorithmConfig, AlgorithmShape, ConstructiveType};
//! use std::time::Duration;
//!
//! let config = AlgorithmConfig::from_toml_str(r#"
//!     random_seed = 7
//!     constructive = "grasp_greedy_random"
//!     algorithm = "vns"
//!
//!     [alpha]
//!     type = "fixed"
//!     value = 0.25
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.constructive, ConstructiveType::GraspGreedyRandom);
//! assert_eq!(config.algorithm, AlgorithmShape::Vns);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert!(config.validate().is_ok());
//! ```
//!
//! Use the defaults when the file is missing:
//!
//! ```
//! use lotforge_config::AlgorithmConfig;
//!
//! let config = AlgorithmConfig::load("lotforge.toml").unwrap_or_default();
//! assert_eq!(config.iterations, 1);
//! ```

use std::path::Path;
use std::time::Duration;

use lotforge_core::LotForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time budget per run when no termination is configured.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(3600);

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for LotForgeError {
    fn from(err: ConfigError) -> Self {
        LotForgeError::Config(err.to_string())
    }
}

/// Main algorithm configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AlgorithmConfig {
    /// Random seed for reproducible runs. A fixed default is used when absent.
    pub random_seed: Option<u64>,

    /// How the initial solution is built.
    pub constructive: ConstructiveType,

    /// Restricted candidate list policy for GRASP constructives.
    pub alpha: AlphaConfig,

    /// Where the collapsing local search sits in the improver chain.
    pub ls_order: LocalSearchOrder,

    /// Outer algorithm shape.
    pub algorithm: AlgorithmShape,

    /// VNS stops escalating once `k` reaches this fraction of the part count.
    pub max_k_pct: f64,

    /// Independent constructions, the best one is kept.
    pub iterations: usize,

    /// Termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            constructive: ConstructiveType::default(),
            alpha: AlphaConfig::default(),
            ls_order: LocalSearchOrder::default(),
            algorithm: AlgorithmShape::default(),
            max_k_pct: 0.5,
            iterations: 1,
            termination: None,
        }
    }
}

impl AlgorithmConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_constructive(mut self, constructive: ConstructiveType) -> Self {
        self.constructive = constructive;
        self
    }

    pub fn with_alpha(mut self, alpha: AlphaConfig) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_algorithm(mut self, algorithm: AlgorithmShape) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_ls_order(mut self, ls_order: LocalSearchOrder) -> Self {
        self.ls_order = ls_order;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the configured step limit, if any.
    pub fn step_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.step_count_limit)
    }

    /// Rejects combinations no solver can be assembled from.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.constructive.is_grasp() && self.alpha == AlphaConfig::None {
            return Err(ConfigError::Invalid(format!(
                "constructive {:?} needs an alpha policy",
                self.constructive
            )));
        }
        if let AlphaConfig::Fixed { value } = self.alpha {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "fixed alpha {value} is outside [0, 1]"
                )));
            }
        }
        if !self.max_k_pct.is_finite() || self.max_k_pct < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_k_pct must be a finite non-negative fraction, got {}",
                self.max_k_pct
            )));
        }
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("iterations must be at least 1".into()));
        }
        Ok(())
    }
}

/// Constructive method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructiveType {
    /// Random slot sizes on random capable machines until demand is met.
    #[default]
    Random,

    /// GRASP, picking at random among candidates under the alpha threshold.
    GraspGreedyRandom,

    /// GRASP, picking the best of a random alpha-sized sample.
    GraspRandomGreedy,

    /// No-shortage slots shuffled onto random capable machines.
    SmallPieces,
}

impl ConstructiveType {
    pub fn is_grasp(&self) -> bool {
        matches!(
            self,
            ConstructiveType::GraspGreedyRandom | ConstructiveType::GraspRandomGreedy
        )
    }
}

/// GRASP alpha policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlphaConfig {
    #[default]
    None,

    /// Drawn uniformly in `[0, 1]` for every construction.
    Random,

    Fixed { value: f64 },
}

/// Order of the plain and collapsing local searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchOrder {
    /// Collapsing search first, then the plain search.
    #[default]
    CollapseFirst,

    /// Plain search first, then the collapsing search.
    CollapseSecond,
}

/// Outer algorithm shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmShape {
    /// Construct, then improve once.
    #[default]
    SinglePass,

    /// Basic VNS with a serial improver chain.
    Vns,

    /// VNS with a variable neighborhood descent improver.
    GeneralVns,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum number of improvement steps.
    pub step_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests;
