use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lotforge_core::Solution;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::stats::SolverStats;
use crate::termination::Termination;

/// Random source threaded through every constructive, explorer and shake.
pub type SolverRng = ChaCha8Rng;

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u64 = 1234;

/// Top-level scope for one solve.
pub struct SolverScope {
    rng: SolverRng,
    start_time: Option<Instant>,
    total_step_count: u64,
    best_solution: Option<Solution>,
    termination: Option<Box<dyn Termination>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    stats: SolverStats,
}

impl SolverScope {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SolverRng::seed_from_u64(seed),
            start_time: None,
            total_step_count: 0,
            best_solution: None,
            termination: None,
            terminate_early_flag: None,
            stats: SolverStats::default(),
        }
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Shares a flag another thread can raise to stop the run early.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    /// Starts the run clock and resets the step counter.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        if !self.stats.is_started() {
            self.stats.start();
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn rng(&mut self) -> &mut SolverRng {
        &mut self.rng
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.stats.record_step();
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// True once the early-termination flag is raised or the configured
    /// termination fires. Without either the run is never cut short.
    pub fn should_terminate(&self) -> bool {
        if self
            .terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            return true;
        }
        self.termination
            .as_ref()
            .is_some_and(|t| t.is_terminated(self))
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolverStats {
        &mut self.stats
    }

    pub fn best_solution(&self) -> Option<&Solution> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best_solution.as_ref().map(Solution::score)
    }

    /// Keeps `solution` if it beats the best so far. Returns whether it did.
    pub fn update_best_solution(&mut self, solution: &Solution) -> bool {
        let is_better = match &self.best_solution {
            None => true,
            Some(best) => solution.score() < best.score(),
        };
        if is_better {
            self.best_solution = Some(solution.clone());
        }
        is_better
    }

    pub fn take_best_solution(&mut self) -> Option<Solution> {
        self.best_solution.take()
    }
}

impl Default for SolverScope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SolverScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("total_step_count", &self.total_step_count)
            .field("best_score", &self.best_score())
            .field("termination", &self.termination)
            .field("stats", &self.stats)
            .finish()
    }
}
