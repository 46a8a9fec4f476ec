//! LotForge - capacitated lot-sizing and scheduling heuristics in Rust
//!
//! Build an [`Instance`] from raw arrays, pick an algorithm through
//! [`AlgorithmConfig`] and call [`solve`].
//!
//! # Example
//!
//! ```rust
//! use lotforge::prelude::*;
//!
//! let data = InstanceData {
//!     name: "demo".into(),
//!     num_parts: 2,
//!     num_machines: 1,
//!     num_periods: 2,
//!     production_rate: vec![vec![1], vec![1]],
//!     changeover_time: vec![vec![0, 4], vec![4, 0]],
//!     inventory: vec![vec![0, -12], vec![0, -12]],
//!     capacity: vec![vec![100, 100]],
//!     priority: vec![vec![1], vec![1]],
//! };
//!
//! let result = lotforge::solve(data, AlgorithmConfig::new().with_random_seed(1)).unwrap();
//! assert!(result.is_valid());
//! assert_eq!(result.solution.shortage(), 0.0);
//! ```

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

pub mod console;

pub use lotforge_config::{
    AlgorithmConfig, AlgorithmShape, AlphaConfig, ConfigError, ConstructiveType, LocalSearchOrder,
    TerminationConfig,
};
pub use lotforge_core::{
    Coordinate, Instance, InstanceData, LotForgeError, MachineReport, Result, Solution,
    SolutionReport, ValidationResult, WorkSlot,
};
pub use lotforge_solver::{SolveResult, Solver, SolverStats};

/// Configuration file read by [`solve_with_config_file`] when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lotforge.toml";

/// Builds the instance and solves it with `config`.
///
/// # Errors
///
/// Instance validation errors, configuration errors, capacity errors during
/// construction and internal-consistency faults.
pub fn solve(data: InstanceData, config: AlgorithmConfig) -> Result<SolveResult> {
    #[cfg(feature = "console")]
    console::init();

    let instance = Arc::new(Instance::new(data)?);
    Solver::new(config)?.solve(instance)
}

/// Like [`solve`], reading the configuration from a TOML file.
///
/// A missing file means the default configuration; an unreadable or
/// malformed one is an error.
pub fn solve_with_config_file(data: InstanceData, path: Option<&Path>) -> Result<SolveResult> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let config = match AlgorithmConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => AlgorithmConfig::default(),
        Err(err) => return Err(err.into()),
    };
    solve(data, config)
}

pub mod prelude {
    pub use super::{
        AlgorithmConfig, AlgorithmShape, AlphaConfig, ConstructiveType, Instance, InstanceData,
        LocalSearchOrder, Solution, SolveResult, Solver,
    };
}
