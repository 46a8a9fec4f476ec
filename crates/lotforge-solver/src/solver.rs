//! Solver implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lotforge_config::AlgorithmConfig;
use lotforge_core::{Instance, LotForgeError, Result, Solution, ValidationResult};
use tracing::{debug, info, warn};

use crate::builder::{Algorithm, AlgorithmBuilder};
use crate::scope::{SolverScope, DEFAULT_SEED};
use crate::stats::SolverStats;

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// The best solution over all iterations.
    pub solution: Solution,
    /// Its cached score.
    pub score: f64,
    /// Post-hoc validation of `solution`.
    pub validation: ValidationResult,
    /// Counters accumulated over every iteration.
    pub stats: SolverStats,
}

impl SolveResult {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn duration(&self) -> Duration {
        self.stats.elapsed()
    }
}

/// Runs the configured algorithm `iterations` times and keeps the best
/// solution.
///
/// # Example
///
/// ```
/// use lotforge_config::AlgorithmConfig;
/// use lotforge_solver::Solver;
///
/// let config = AlgorithmConfig::new().with_random_seed(7).with_iterations(2);
/// let solver = Solver::new(config).unwrap();
/// assert_eq!(solver.config().iterations, 2);
/// ```
#[derive(Debug)]
pub struct Solver {
    config: AlgorithmConfig,
    algorithm: Algorithm,
    terminate_early_flag: Arc<AtomicBool>,
}

impl Solver {
    /// Validates `config` and assembles the algorithm.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Config`] for an inconsistent configuration.
    pub fn new(config: AlgorithmConfig) -> Result<Self> {
        let algorithm = AlgorithmBuilder::build(&config)?;
        Ok(Self {
            config,
            algorithm,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Handle that stops a running solve at its next termination check.
    /// The flag is cleared when the solve returns.
    pub fn terminate_early_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag.load(Ordering::SeqCst)
    }

    /// Solves `instance`.
    ///
    /// # Errors
    ///
    /// Capacity errors from construction and internal-consistency faults.
    /// A solution that fails validation is returned, not raised.
    pub fn solve(&mut self, instance: Arc<Instance>) -> Result<SolveResult> {
        let seed = self.config.random_seed.unwrap_or(DEFAULT_SEED);
        let mut solver_scope = SolverScope::with_seed(seed)
            .with_termination(AlgorithmBuilder::termination(&self.config))
            .with_terminate_early_flag(Arc::clone(&self.terminate_early_flag));

        info!(
            event = "solve_start",
            instance = instance.name(),
            parts = instance.num_parts(),
            machines = instance.num_machines(),
            periods = instance.num_periods(),
            constructive = ?self.config.constructive,
            algorithm = ?self.config.algorithm,
            iterations = self.config.iterations,
            seed = seed,
        );

        for iteration in 0..self.config.iterations {
            if iteration > 0 && self.is_terminate_early() {
                break;
            }
            solver_scope.start_solving();
            let solution = self.algorithm.run(&instance, &mut solver_scope)?;
            let improved = solver_scope.update_best_solution(&solution);
            debug!(
                event = "iteration",
                iteration = iteration,
                score = solution.score(),
                best_score = solver_scope.best_score(),
                improved = improved,
            );
        }

        let solution = solver_scope
            .take_best_solution()
            .ok_or_else(|| LotForgeError::Fault("solve finished without any solution".to_string()))?;
        let validation = solution.validate();
        if let ValidationResult::Failed { reason } = &validation {
            warn!(event = "validation_failed", reason = %reason);
        }

        self.terminate_early_flag.store(false, Ordering::SeqCst);
        let stats = solver_scope.stats().clone();
        info!(
            event = "solve_end",
            duration_ms = stats.elapsed().as_millis() as u64,
            steps = stats.step_count,
            moves_evaluated = stats.moves_evaluated,
            speed = stats.moves_per_second(),
            score = solution.score(),
            valid = validation.is_valid(),
        );

        Ok(SolveResult {
            score: solution.score(),
            solution,
            validation,
            stats,
        })
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
