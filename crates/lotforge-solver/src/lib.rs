//! LotForge Solver Engine
//!
//! This crate provides the search machinery on top of `lotforge-core`:
//! - Move evaluation (Insert, Exchange and swap-chain relocations)
//! - Neighborhood explorers
//! - Phases (construction, local search, VND, VNS)
//! - Termination conditions
//! - Configuration wiring (builder module) and the solver loop

pub mod builder;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;

pub use builder::{Algorithm, AlgorithmBuilder};
pub use heuristic::{
    ExchangeNeighborhood, ExtendedNeighborhood, InsertNeighborhood, Move, MoveFilter, MoveKind,
    Neighborhood, PriorityInsertNeighborhood, SwapChainNeighborhood,
};
pub use phase::{
    construction::{
        Constructive, GraspCandidate, GraspConstructive, GraspStrategy, RandomConstructive,
        SmallPiecesConstructive,
    },
    localsearch::{
        BestImprovementForager, FirstImprovementForager, LocalSearch, LocalSearchForager,
        PriorityForager,
    },
    vns::{escalate, Escalation, RandomMoveShake, Vns},
    Improver, SerialImprover, VndImprover,
};
pub use scope::{SolverRng, SolverScope, DEFAULT_SEED};
pub use solver::{SolveResult, Solver};
pub use stats::{PhaseStats, SolverStats};
pub use termination::{OrTermination, StepCountTermination, Termination, TimeTermination};
