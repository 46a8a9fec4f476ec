//! Builder module for constructing solver components from configuration
//!
//! This module provides the wiring between [`AlgorithmConfig`] and the
//! constructives, improvers, terminations and outer algorithm shapes.

use std::sync::Arc;

use lotforge_config::{
    AlgorithmConfig, AlgorithmShape, ConstructiveType, LocalSearchOrder, DEFAULT_TIME_LIMIT,
};
use lotforge_core::{Instance, Result, Solution};
use tracing::info;

use crate::heuristic::neighborhood::InsertNeighborhood;
use crate::phase::construction::{
    Constructive, GraspConstructive, GraspStrategy, RandomConstructive, SmallPiecesConstructive,
};
use crate::phase::localsearch::LocalSearch;
use crate::phase::vns::{RandomMoveShake, Vns};
use crate::phase::{Improver, SerialImprover, VndImprover};
use crate::scope::SolverScope;
use crate::stats::PhaseStats;
use crate::termination::{OrTermination, StepCountTermination, Termination, TimeTermination};

/// Builder for constructing solver components from configuration.
pub struct AlgorithmBuilder;

impl AlgorithmBuilder {
    /// Builds the constructive named by `config.constructive`.
    pub fn constructive(config: &AlgorithmConfig) -> Box<dyn Constructive> {
        match config.constructive {
            ConstructiveType::Random => Box::new(RandomConstructive::new()),
            ConstructiveType::SmallPieces => Box::new(SmallPiecesConstructive::new()),
            ConstructiveType::GraspGreedyRandom => {
                Box::new(GraspConstructive::new(GraspStrategy::GreedyRandom, config.alpha))
            }
            ConstructiveType::GraspRandomGreedy => {
                Box::new(GraspConstructive::new(GraspStrategy::RandomGreedy, config.alpha))
            }
        }
    }

    /// Chains a collapsing and a plain best-improvement insert search.
    ///
    /// The collapsing search runs first or second as `ls_order` says; the
    /// chain is a VND for general VNS and a single serial pass otherwise.
    pub fn improver(config: &AlgorithmConfig) -> Box<dyn Improver> {
        let collapsing: Box<dyn Improver> =
            Box::new(LocalSearch::best_improvement(InsertNeighborhood::improving()).collapsing());
        let plain: Box<dyn Improver> =
            Box::new(LocalSearch::best_improvement(InsertNeighborhood::improving()));
        let improvers = match config.ls_order {
            LocalSearchOrder::CollapseFirst => vec![collapsing, plain],
            LocalSearchOrder::CollapseSecond => vec![plain, collapsing],
        };
        match config.algorithm {
            AlgorithmShape::GeneralVns => Box::new(VndImprover::new(improvers)),
            AlgorithmShape::SinglePass | AlgorithmShape::Vns => Box::new(SerialImprover::new(improvers)),
        }
    }

    /// Time limit (one hour when none is configured), or-ed with the step
    /// limit when one is configured. Both apply to each run.
    pub fn termination(config: &AlgorithmConfig) -> Box<dyn Termination> {
        let time = TimeTermination::new(config.time_limit().unwrap_or(DEFAULT_TIME_LIMIT));
        match config.step_limit() {
            Some(steps) => Box::new(OrTermination::new((time, StepCountTermination::new(steps)))),
            None => Box::new(time),
        }
    }

    /// Validates `config` and assembles the algorithm it describes.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Config`](lotforge_core::LotForgeError::Config) when
    /// the configuration is inconsistent.
    pub fn build(config: &AlgorithmConfig) -> Result<Algorithm> {
        config.validate()?;
        let improver = Self::improver(config);
        let search = match config.algorithm {
            AlgorithmShape::SinglePass => Search::Improve(improver),
            AlgorithmShape::Vns | AlgorithmShape::GeneralVns => {
                Search::Vns(Vns::new(RandomMoveShake::default(), improver, config.max_k_pct))
            }
        };
        Ok(Algorithm {
            constructive: Self::constructive(config),
            search,
        })
    }
}

#[derive(Debug)]
enum Search {
    Improve(Box<dyn Improver>),
    Vns(Vns),
}

/// A constructive followed by an improver or a VNS around one.
#[derive(Debug)]
pub struct Algorithm {
    constructive: Box<dyn Constructive>,
    search: Search,
}

impl Algorithm {
    pub fn new_single_pass(constructive: Box<dyn Constructive>, improver: Box<dyn Improver>) -> Self {
        Self {
            constructive,
            search: Search::Improve(improver),
        }
    }

    pub fn new_vns(constructive: Box<dyn Constructive>, vns: Vns) -> Self {
        Self {
            constructive,
            search: Search::Vns(vns),
        }
    }

    pub fn is_vns(&self) -> bool {
        matches!(self.search, Search::Vns(_))
    }

    /// Builds one solution of `instance` from scratch and improves it.
    ///
    /// # Errors
    ///
    /// Capacity errors from construction and faults from the move engine.
    pub fn run(&mut self, instance: &Arc<Instance>, solver_scope: &mut SolverScope) -> Result<Solution> {
        let mut solution = Solution::new(Arc::clone(instance));

        let construction = PhaseStats::new(self.constructive.constructive_type_name());
        info!(event = "phase_start", phase = construction.phase_type);
        self.constructive.construct(&mut solution, solver_scope)?;
        info!(
            event = "phase_end",
            phase = construction.phase_type,
            duration_ms = construction.elapsed_ms(),
            work_slots = solution.total_work_slots(),
            score = solution.score(),
        );

        match &mut self.search {
            Search::Improve(improver) => {
                let mut phase_stats = PhaseStats::new(improver.improver_type_name());
                info!(event = "phase_start", phase = phase_stats.phase_type, score = solution.score());
                let steps_before = solver_scope.total_step_count();
                improver.improve(&mut solution, solver_scope)?;
                phase_stats.step_count = solver_scope.total_step_count() - steps_before;
                info!(
                    event = "phase_end",
                    phase = phase_stats.phase_type,
                    duration_ms = phase_stats.elapsed_ms(),
                    steps = phase_stats.step_count,
                    score = solution.score(),
                );
            }
            Search::Vns(vns) => vns.run(&mut solution, solver_scope)?,
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotforge_config::AlphaConfig;
    use lotforge_core::LotForgeError;
    use lotforge_test::{tight_periods, two_by_two};

    #[test]
    fn test_constructive_builder_follows_config() {
        let cases = [
            (ConstructiveType::Random, "RandomConstructive"),
            (ConstructiveType::SmallPieces, "SmallPiecesConstructive"),
            (ConstructiveType::GraspGreedyRandom, "GraspGreedyRandom"),
            (ConstructiveType::GraspRandomGreedy, "GraspRandomGreedy"),
        ];
        for (constructive, name) in cases {
            let config = AlgorithmConfig::new()
                .with_constructive(constructive)
                .with_alpha(AlphaConfig::Random);
            assert_eq!(AlgorithmBuilder::constructive(&config).constructive_type_name(), name);
        }
    }

    #[test]
    fn test_improver_builder_chains() {
        let serial = AlgorithmBuilder::improver(&AlgorithmConfig::new());
        assert_eq!(serial.improver_type_name(), "Serial");

        let vnd = AlgorithmBuilder::improver(&AlgorithmConfig::new().with_algorithm(AlgorithmShape::GeneralVns));
        assert_eq!(vnd.improver_type_name(), "VariableNeighborhoodDescent");
    }

    #[test]
    fn test_build_rejects_grasp_without_alpha() {
        let config = AlgorithmConfig::new().with_constructive(ConstructiveType::GraspRandomGreedy);
        let err = AlgorithmBuilder::build(&config).unwrap_err();
        assert!(matches!(err, LotForgeError::Config(_)));
    }

    #[test]
    fn test_build_selects_shape() {
        assert!(!AlgorithmBuilder::build(&AlgorithmConfig::new()).unwrap().is_vns());
        for shape in [AlgorithmShape::Vns, AlgorithmShape::GeneralVns] {
            let config = AlgorithmConfig::new().with_algorithm(shape);
            assert!(AlgorithmBuilder::build(&config).unwrap().is_vns());
        }
    }

    #[test]
    fn test_step_limit_termination() {
        let mut config = AlgorithmConfig::new();
        config.termination = Some(lotforge_config::TerminationConfig {
            step_count_limit: Some(2),
            ..Default::default()
        });
        let mut scope = SolverScope::new().with_termination(AlgorithmBuilder::termination(&config));
        scope.start_solving();
        assert!(!scope.should_terminate());
        scope.increment_step_count();
        scope.increment_step_count();
        assert!(scope.should_terminate());
    }

    #[test]
    fn test_algorithm_run_produces_consistent_solution() {
        for order in [LocalSearchOrder::CollapseFirst, LocalSearchOrder::CollapseSecond] {
            let config = AlgorithmConfig::new().with_ls_order(order);
            let mut algorithm = AlgorithmBuilder::build(&config).unwrap();
            let mut scope = SolverScope::with_seed(17);
            scope.start_solving();

            let solution = algorithm.run(&tight_periods(), &mut scope).unwrap();
            assert!(!solution.is_empty());
            assert!(solution.validate().is_valid());
        }
    }

    #[test]
    fn test_random_construction_plus_search_keeps_demand_covered() {
        let mut algorithm = AlgorithmBuilder::build(&AlgorithmConfig::new()).unwrap();
        let mut scope = SolverScope::with_seed(1);
        scope.start_solving();

        let solution = algorithm.run(&two_by_two(), &mut scope).unwrap();
        assert_eq!(solution.shortage(), 0.0);
        assert_eq!(solution.score(), solution.changeover());
    }
}
