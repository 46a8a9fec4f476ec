//! Counters reported at the end of a solve and of every phase.

use std::time::{Duration, Instant};

/// Totals over every iteration of one solve.
///
/// Unlike the step budget, which restarts per iteration, these counters
/// only grow. The clock starts on the first iteration and is never reset.
///
/// ```
/// use lotforge_solver::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// // One local-search step: twelve candidates scored, the best committed.
/// stats.record_evaluations(12);
/// stats.record_accepted();
/// stats.record_step();
/// // A GRASP pick scoring five candidate placements.
/// stats.record_score_calculations(5);
///
/// assert_eq!((stats.step_count, stats.moves_evaluated, stats.moves_accepted), (1, 12, 1));
/// assert_eq!(stats.score_calculations, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    start_time: Option<Instant>,
    /// Moves committed by local searches.
    pub step_count: u64,
    /// Insert, Exchange and swap-chain candidates priced by the explorers.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    /// Placements a GRASP constructive scored from scratch.
    pub score_calculations: u64,
}

impl SolverStats {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Time since the first iteration started; zero before that.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Adds one explorer pass worth of priced candidates.
    pub fn record_evaluations(&mut self, count: usize) {
        self.moves_evaluated += count as u64;
    }

    pub fn record_accepted(&mut self) {
        self.moves_accepted += 1;
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_score_calculations(&mut self, count: usize) {
        self.score_calculations += count as u64;
    }

    /// Priced candidates per second of the whole solve.
    pub fn moves_per_second(&self) -> u64 {
        per_second(self.moves_evaluated, self.elapsed())
    }
}

/// Counters of one construction, improvement, local search or VNS phase.
///
/// A VNS phase counts one step per shake-and-improve round; a local search
/// counts one per committed move.
#[derive(Debug)]
pub struct PhaseStats {
    pub phase_type: &'static str,
    start_time: Instant,
    pub step_count: u64,
    pub moves_evaluated: u64,
}

impl PhaseStats {
    pub fn new(phase_type: &'static str) -> Self {
        Self {
            phase_type,
            start_time: Instant::now(),
            step_count: 0,
            moves_evaluated: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_evaluations(&mut self, count: usize) {
        self.moves_evaluated += count as u64;
    }

    pub fn moves_per_second(&self) -> u64 {
        per_second(self.moves_evaluated, self.elapsed())
    }
}

fn per_second(count: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (count as f64 / secs) as u64
    } else {
        0
    }
}
