//! Heuristic components: moves and the neighborhoods that generate them.

pub mod r#move;
pub mod neighborhood;

pub use neighborhood::{
    ExchangeNeighborhood, ExtendedNeighborhood, InsertNeighborhood, MoveFilter, Neighborhood,
    PriorityInsertNeighborhood, SwapChainNeighborhood,
};
pub use r#move::{Move, MoveKind};
